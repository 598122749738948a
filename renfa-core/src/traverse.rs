//! Breadth-first enumeration of an automaton graph
//!
//! This is the read-only contract exporters build on: starting from one
//! state, every reachable state is yielded exactly once, in breadth-first
//! order, with its transitions in insertion order. The walk keeps its own
//! visited set, so cycles terminate and the graph is never touched.

use crate::nfa::{Nfa, State, StateId};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Iterator over the states reachable from a start state
#[derive(Debug, Clone)]
pub struct Bfs<'a> {
    nfa: &'a Nfa,
    queue: VecDeque<StateId>,
    /// Indexed by state ID
    visited: Vec<bool>,
}

impl<'a> Bfs<'a> {
    fn new(nfa: &'a Nfa, start: StateId) -> Self {
        let mut visited = vec![false; nfa.len()];
        let mut queue = VecDeque::new();
        if let Some(seen) = visited.get_mut(start) {
            *seen = true;
            queue.push_back(start);
        }
        Bfs {
            nfa,
            queue,
            visited,
        }
    }
}

impl<'a> Iterator for Bfs<'a> {
    type Item = &'a State;

    fn next(&mut self) -> Option<&'a State> {
        let nfa = self.nfa;
        let state = nfa.state(self.queue.pop_front()?)?;
        for transition in state.transitions() {
            if let Some(seen) = self.visited.get_mut(transition.target) {
                if !*seen {
                    *seen = true;
                    self.queue.push_back(transition.target);
                }
            }
        }
        Some(state)
    }
}

impl FusedIterator for Bfs<'_> {}

impl Nfa {
    /// Walk the states reachable from `start`, breadth first.
    ///
    /// A `start` that is not a state of this session yields nothing.
    pub fn bfs(&self, start: StateId) -> Bfs<'_> {
        Bfs::new(self, start)
    }
}
