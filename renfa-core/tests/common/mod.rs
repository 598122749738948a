//! Test support: run an automaton over an input by epsilon-closure reachability

#![allow(dead_code)]

use renfa_core::{Nfa, StateId, Symbol};
use std::collections::HashSet;

/// Whether the automaton rooted at `start` accepts `input`
pub fn accepts(nfa: &Nfa, start: StateId, input: &str) -> bool {
    let mut current = nfa.epsilon_closure(&HashSet::from([start]));

    for c in input.chars() {
        let next: HashSet<StateId> = current
            .iter()
            .filter_map(|&id| nfa.state(id))
            .flat_map(|state| state.transitions())
            .filter(|t| t.symbol == Symbol::Char(c))
            .map(|t| t.target)
            .collect();
        current = nfa.epsilon_closure(&next);
    }

    current
        .iter()
        .filter_map(|&id| nfa.state(id))
        .any(|state| state.is_accepting())
}

/// All strings over `alphabet` of exactly `len` characters
pub fn strings_of_len(alphabet: &[char], len: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    for _ in 0..len {
        out = out
            .iter()
            .flat_map(|prefix| {
                alphabet.iter().map(move |c| {
                    let mut s = prefix.clone();
                    s.push(*c);
                    s
                })
            })
            .collect();
    }
    out
}

/// IDs of every accepting state in the arena
pub fn accepting_states(nfa: &Nfa) -> Vec<StateId> {
    nfa.states()
        .iter()
        .filter(|s| s.is_accepting())
        .map(|s| s.id())
        .collect()
}
