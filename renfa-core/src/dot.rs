//! Graphviz DOT export
//!
//! Built entirely on [`Nfa::bfs`]: states appear in breadth-first order from
//! the start state and edges in the order they were added, so the output is
//! stable for a given automaton.

use crate::nfa::{Nfa, StateId, Symbol};
use std::io::{self, Write};

/// Human-readable edge label for a symbol, escaped for a DOT string
pub fn symbol_label(symbol: Symbol) -> String {
    match symbol {
        Symbol::Epsilon => "ε".to_string(),
        Symbol::Char('\n') => "\\\\n".to_string(),
        Symbol::Char('\t') => "\\\\t".to_string(),
        Symbol::Char('\r') => "\\\\r".to_string(),
        Symbol::Char('"') => "\\\"".to_string(),
        Symbol::Char('\\') => "\\\\".to_string(),
        Symbol::Char(c) => c.to_string(),
    }
}

/// Write the automaton reachable from `start` as a DOT digraph
pub fn write_dot<W: Write>(nfa: &Nfa, start: StateId, mut out: W) -> io::Result<()> {
    writeln!(out, "digraph NFA {{")?;
    writeln!(out, "    rankdir=LR;")?;
    writeln!(out, "    node [shape=circle];")?;
    writeln!(out, "    \"start\" [shape=point];")?;
    writeln!(out, "    \"start\" -> \"{}\";", start)?;

    for state in nfa.bfs(start) {
        if state.is_accepting() {
            writeln!(out, "    \"{}\" [shape=doublecircle];", state.id())?;
        }
        for transition in state.transitions() {
            writeln!(
                out,
                "    \"{}\" -> \"{}\" [label=\"{}\"];",
                state.id(),
                transition.target,
                symbol_label(transition.symbol)
            )?;
        }
    }

    writeln!(out, "}}")?;
    out.flush()
}

/// Render the automaton reachable from `start` as a DOT string
pub fn to_dot(nfa: &Nfa, start: StateId) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    if write_dot(nfa, start, &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
