//! NFA (Nondeterministic Finite Automaton) state and transition model
//!
//! An [`Nfa`] is one construction session: it owns every state created while
//! building an automaton, hands out state IDs from a single counter, and is
//! torn down by dropping it. The construction rules live in
//! [`crate::thompson`], breadth-first traversal in [`crate::traverse`].

use crate::error::NfaError;
use log::trace;
use std::collections::HashSet;
use std::fmt;

/// An NFA state ID (also the state's index in its session)
pub type StateId = usize;

/// The label of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Transition on a specific character
    Char(char),
    /// Epsilon transition (no input consumed)
    Epsilon,
}

impl Symbol {
    /// Whether this label consumes no input
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Symbol::Epsilon)
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Char(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Char(c) => write!(f, "{:?}", c),
            Symbol::Epsilon => write!(f, "ε"),
        }
    }
}

/// A directed, labeled edge owned by its source state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The label
    pub symbol: Symbol,
    /// The destination state
    pub target: StateId,
}

/// An NFA state
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    id: StateId,
    is_accepting: bool,
    transitions: Vec<Transition>,
}

impl State {
    fn new(id: StateId, is_accepting: bool) -> Self {
        State {
            id,
            is_accepting,
            transitions: Vec::new(),
        }
    }

    /// The state's session-unique ID
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Whether this is an accepting state
    pub fn is_accepting(&self) -> bool {
        self.is_accepting
    }

    /// Outgoing transitions, in the order they were added
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

/// Settings for a construction session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    state_limit: Option<usize>,
}

impl Config {
    /// A configuration with no state limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of states the session may allocate.
    ///
    /// Exceeding the cap makes the offending operation fail with
    /// [`NfaError::AllocationFailure`]. `None` (the default) means the only
    /// cap is available memory.
    pub fn state_limit(mut self, limit: Option<usize>) -> Self {
        self.state_limit = limit;
        self
    }

    /// The configured state limit, if any
    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit
    }
}

/// A construction session: the arena owning all states of an automaton
#[derive(Debug, Clone, Default)]
pub struct Nfa {
    /// All states; a state's ID is its index here
    states: Vec<State>,
    config: Config,
}

impl Nfa {
    /// Start a new, empty session
    pub fn new() -> Self {
        Self::with_config(Config::new())
    }

    /// Start a new session with the given settings
    pub fn with_config(config: Config) -> Self {
        Nfa {
            states: Vec::new(),
            config,
        }
    }

    /// The session's settings
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of states allocated so far
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state has been allocated yet
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Look up a state by ID
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    /// All states, ordered by ID
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Make room for `n` more states, honoring the configured limit
    pub(crate) fn reserve_states(&mut self, n: usize) -> Result<(), NfaError> {
        if let Some(limit) = self.config.state_limit {
            if self.states.len().saturating_add(n) > limit {
                return Err(NfaError::AllocationFailure {
                    what: "states",
                    requested: n,
                    limit: Some(limit),
                });
            }
        }
        self.states
            .try_reserve(n)
            .map_err(|_| NfaError::AllocationFailure {
                what: "states",
                requested: n,
                limit: None,
            })
    }

    /// Make room for `n` more transitions on `from`
    pub(crate) fn reserve_transitions(&mut self, from: StateId, n: usize) -> Result<(), NfaError> {
        let state = self
            .states
            .get_mut(from)
            .ok_or(NfaError::UnknownState(from))?;
        state
            .transitions
            .try_reserve(n)
            .map_err(|_| NfaError::AllocationFailure {
                what: "transitions",
                requested: n,
                limit: None,
            })
    }

    /// Allocate a new state and return its ID
    pub fn create_state(&mut self, accepting: bool) -> Result<StateId, NfaError> {
        self.reserve_states(1)?;
        let id = self.states.len();
        self.states.push(State::new(id, accepting));
        trace!("state {} (accepting: {})", id, accepting);
        Ok(id)
    }

    /// Append a transition from `from` to `to`.
    ///
    /// Existing transitions on `from` are kept, including ones with the same
    /// symbol.
    pub fn add_transition(
        &mut self,
        from: StateId,
        symbol: Symbol,
        to: StateId,
    ) -> Result<(), NfaError> {
        if to >= self.states.len() {
            return Err(NfaError::UnknownState(to));
        }
        self.reserve_transitions(from, 1)?;
        self.states[from].transitions.push(Transition { symbol, target: to });
        trace!("transition {} -[{}]-> {}", from, symbol, to);
        Ok(())
    }

    /// Clear or set the accepting flag of a state
    pub(crate) fn set_accepting(&mut self, id: StateId, accepting: bool) -> Result<(), NfaError> {
        let state = self
            .states
            .get_mut(id)
            .ok_or(NfaError::UnknownState(id))?;
        state.is_accepting = accepting;
        Ok(())
    }

    /// Compute epsilon closure of a set of states
    pub fn epsilon_closure(&self, states: &HashSet<StateId>) -> HashSet<StateId> {
        let mut closure = states.clone();
        let mut stack: Vec<_> = states.iter().copied().collect();

        while let Some(state) = stack.pop() {
            let Some(state) = self.states.get(state) else {
                continue;
            };
            for transition in &state.transitions {
                if transition.symbol.is_epsilon() && closure.insert(transition.target) {
                    stack.push(transition.target);
                }
            }
        }

        closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_ids_are_sequential() {
        let mut nfa = Nfa::new();
        let s0 = nfa.create_state(false).unwrap();
        let s1 = nfa.create_state(true).unwrap();
        let s2 = nfa.create_state(false).unwrap();

        assert_eq!((s0, s1, s2), (0, 1, 2));
        assert_eq!(nfa.len(), 3);
        assert!(nfa.state(s1).unwrap().is_accepting());
        assert!(!nfa.state(s2).unwrap().is_accepting());
        assert_eq!(nfa.state(s2).unwrap().id(), 2);
    }

    #[test]
    fn test_new_state_has_no_transitions() {
        let mut nfa = Nfa::new();
        let s = nfa.create_state(false).unwrap();
        assert!(nfa.state(s).unwrap().transitions().is_empty());
    }

    #[test]
    fn test_transitions_keep_insertion_order() {
        let mut nfa = Nfa::new();
        let s0 = nfa.create_state(false).unwrap();
        let s1 = nfa.create_state(false).unwrap();
        let s2 = nfa.create_state(true).unwrap();

        nfa.add_transition(s0, Symbol::Char('a'), s1).unwrap();
        nfa.add_transition(s0, Symbol::Char('a'), s2).unwrap();
        nfa.add_transition(s0, Symbol::Epsilon, s2).unwrap();

        let targets: Vec<_> = nfa.state(s0).unwrap().transitions().to_vec();
        assert_eq!(
            targets,
            vec![
                Transition {
                    symbol: Symbol::Char('a'),
                    target: s1
                },
                Transition {
                    symbol: Symbol::Char('a'),
                    target: s2
                },
                Transition {
                    symbol: Symbol::Epsilon,
                    target: s2
                },
            ]
        );
    }

    #[test]
    fn test_transition_to_unknown_state() {
        let mut nfa = Nfa::new();
        let s0 = nfa.create_state(false).unwrap();

        assert_eq!(
            nfa.add_transition(s0, Symbol::Epsilon, 7),
            Err(NfaError::UnknownState(7))
        );
        assert_eq!(
            nfa.add_transition(3, Symbol::Epsilon, s0),
            Err(NfaError::UnknownState(3))
        );
        assert!(nfa.state(s0).unwrap().transitions().is_empty());
    }

    #[test]
    fn test_state_limit() {
        let mut nfa = Nfa::with_config(Config::new().state_limit(Some(2)));
        nfa.create_state(false).unwrap();
        nfa.create_state(true).unwrap();

        assert_eq!(
            nfa.create_state(false),
            Err(NfaError::AllocationFailure {
                what: "states",
                requested: 1,
                limit: Some(2),
            })
        );
        assert_eq!(nfa.len(), 2);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.get_state_limit(), None);
        assert_eq!(Nfa::new().config(), &config);
    }

    #[test]
    fn test_epsilon_closure() {
        let mut nfa = Nfa::new();
        let s0 = nfa.create_state(false).unwrap();
        let s1 = nfa.create_state(false).unwrap();
        let s2 = nfa.create_state(false).unwrap();
        let s3 = nfa.create_state(true).unwrap();

        nfa.add_transition(s0, Symbol::Epsilon, s1).unwrap();
        nfa.add_transition(s1, Symbol::Epsilon, s2).unwrap();
        nfa.add_transition(s2, Symbol::Char('x'), s3).unwrap();
        nfa.add_transition(s2, Symbol::Epsilon, s0).unwrap();

        let closure = nfa.epsilon_closure(&[s0].into_iter().collect());
        assert!(closure.contains(&s0));
        assert!(closure.contains(&s1));
        assert!(closure.contains(&s2));
        assert!(!closure.contains(&s3));
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::Char('a').to_string(), "'a'");
        assert_eq!(Symbol::Epsilon.to_string(), "ε");
        assert_eq!(Symbol::from('\n'), Symbol::Char('\n'));
    }
}
