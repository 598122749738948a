//! Thompson's construction
//!
//! Each operation builds one [`Fragment`]: a sub-automaton with exactly one
//! start state and exactly one accepting state. Operand fragments are taken
//! by value; once composed, their states belong to the result and the old
//! handles are gone.
//!
//! All operand checks run before the session is touched. A failure after
//! that point (allocation) leaves the session partially built, and the
//! whole [`Nfa`] should be dropped.

use crate::error::NfaError;
use crate::nfa::{Nfa, StateId, Symbol};
use log::debug;

/// Number of symbols in [`any_alphabet`]
pub const ANY_ALPHABET_LEN: usize = 98;

/// The symbols `.` matches: printable ASCII, then `\n`, `\t` and `\r`
pub fn any_alphabet() -> impl Iterator<Item = char> {
    (' '..='~').chain(['\n', '\t', '\r'])
}

/// A sub-automaton with one start and one accepting state
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a fragment should be composed further or kept as the automaton root"]
pub struct Fragment {
    start: StateId,
    accept: StateId,
    state_count: usize,
}

impl Fragment {
    pub(crate) fn new(start: StateId, accept: StateId, state_count: usize) -> Self {
        Fragment {
            start,
            accept,
            state_count,
        }
    }

    /// The start state
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The single accepting state
    pub fn accept(&self) -> StateId {
        self.accept
    }

    /// Number of states making up the fragment
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    fn malformed(&self) -> NfaError {
        NfaError::MalformedFragment {
            start: self.start,
            accept: self.accept,
        }
    }
}

impl Nfa {
    /// Build `start --c--> accept`
    pub fn literal(&mut self, c: char) -> Result<Fragment, NfaError> {
        debug!("literal {:?}", c);
        self.leaf(std::iter::once(Symbol::Char(c)))
    }

    /// Build `start --x--> accept` for every `x` in [`any_alphabet`]
    pub fn any(&mut self) -> Result<Fragment, NfaError> {
        debug!("any ({} symbols)", ANY_ALPHABET_LEN);
        self.leaf(any_alphabet().map(Symbol::Char))
    }

    /// Build `start --ε--> accept`
    pub fn epsilon(&mut self) -> Result<Fragment, NfaError> {
        debug!("epsilon");
        self.leaf(std::iter::once(Symbol::Epsilon))
    }

    /// Build `start --x--> accept` for every `x` in `lo..=hi`.
    ///
    /// Fails with [`NfaError::InvalidRange`] and allocates nothing when
    /// `lo > hi`.
    pub fn range(&mut self, lo: char, hi: char) -> Result<Fragment, NfaError> {
        if lo > hi {
            return Err(NfaError::InvalidRange { lo, hi });
        }
        debug!("range {:?}-{:?}", lo, hi);
        self.leaf((lo..=hi).map(Symbol::Char))
    }

    /// Alternation `a|b`
    pub fn union(&mut self, a: Fragment, b: Fragment) -> Result<Fragment, NfaError> {
        self.check_pair(&a, &b)?;
        debug!(
            "union of {}..{} and {}..{}",
            a.start, a.accept, b.start, b.accept
        );

        let (start, accept) = self.wrapper_states()?;
        self.add_transition(start, Symbol::Epsilon, a.start)?;
        self.add_transition(start, Symbol::Epsilon, b.start)?;
        self.retire_accept(a.accept, &[accept])?;
        self.retire_accept(b.accept, &[accept])?;

        Ok(Fragment::new(
            start,
            accept,
            a.state_count + b.state_count + 2,
        ))
    }

    /// Concatenation `ab`. Allocates no states.
    pub fn concat(&mut self, a: Fragment, b: Fragment) -> Result<Fragment, NfaError> {
        self.check_pair(&a, &b)?;
        debug!(
            "concat of {}..{} and {}..{}",
            a.start, a.accept, b.start, b.accept
        );

        self.retire_accept(a.accept, &[b.start])?;

        Ok(Fragment::new(
            a.start,
            b.accept,
            a.state_count + b.state_count,
        ))
    }

    /// Kleene star `a*`
    pub fn kleene_star(&mut self, a: Fragment) -> Result<Fragment, NfaError> {
        debug!("kleene star of {}..{}", a.start, a.accept);
        self.repeat(a, true)
    }

    /// One or more `a+`: like [`Nfa::kleene_star`] without the path that
    /// skips `a` entirely.
    pub fn one_or_more(&mut self, a: Fragment) -> Result<Fragment, NfaError> {
        debug!("one or more of {}..{}", a.start, a.accept);
        self.repeat(a, false)
    }

    /// Optional `a?`
    pub fn optional(&mut self, a: Fragment) -> Result<Fragment, NfaError> {
        self.check(&a)?;
        debug!("optional {}..{}", a.start, a.accept);

        let (start, accept) = self.wrapper_states()?;
        self.add_transition(start, Symbol::Epsilon, a.start)?;
        self.add_transition(start, Symbol::Epsilon, accept)?;
        self.retire_accept(a.accept, &[accept])?;

        Ok(Fragment::new(start, accept, a.state_count + 2))
    }

    /// Shared body of `*` and `+`
    fn repeat(&mut self, a: Fragment, allow_empty: bool) -> Result<Fragment, NfaError> {
        self.check(&a)?;

        let (start, accept) = self.wrapper_states()?;
        self.add_transition(start, Symbol::Epsilon, a.start)?;
        if allow_empty {
            self.add_transition(start, Symbol::Epsilon, accept)?;
        }
        self.retire_accept(a.accept, &[a.start, accept])?;

        Ok(Fragment::new(start, accept, a.state_count + 2))
    }

    /// Two fresh states joined by one transition per symbol
    fn leaf<I>(&mut self, symbols: I) -> Result<Fragment, NfaError>
    where
        I: Iterator<Item = Symbol>,
    {
        let (start, accept) = self.wrapper_states()?;
        self.reserve_transitions(start, symbols.size_hint().0)?;
        for symbol in symbols {
            self.add_transition(start, symbol, accept)?;
        }
        Ok(Fragment::new(start, accept, 2))
    }

    /// A fresh non-accepting start and a fresh accepting state
    fn wrapper_states(&mut self) -> Result<(StateId, StateId), NfaError> {
        self.reserve_states(2)?;
        let start = self.create_state(false)?;
        let accept = self.create_state(true)?;
        Ok((start, accept))
    }

    /// Demote a fragment's accept state and link it onward with epsilons.
    ///
    /// Nothing changes unless every edge can be added.
    fn retire_accept(&mut self, accept: StateId, targets: &[StateId]) -> Result<(), NfaError> {
        if let Some(&missing) = targets.iter().find(|&&target| target >= self.len()) {
            return Err(NfaError::UnknownState(missing));
        }
        self.reserve_transitions(accept, targets.len())?;
        self.set_accepting(accept, false)?;
        for &target in targets {
            self.add_transition(accept, Symbol::Epsilon, target)?;
        }
        Ok(())
    }

    /// A fragment is live when both handles are states of this session,
    /// they differ, and only the accept handle is accepting.
    fn check(&self, fragment: &Fragment) -> Result<(), NfaError> {
        let live = fragment.start != fragment.accept
            && matches!(self.state(fragment.start), Some(s) if !s.is_accepting())
            && matches!(self.state(fragment.accept), Some(s) if s.is_accepting());
        if live {
            Ok(())
        } else {
            Err(fragment.malformed())
        }
    }

    fn check_pair(&self, a: &Fragment, b: &Fragment) -> Result<(), NfaError> {
        self.check(a)?;
        self.check(b)?;
        let shared = [a.start, a.accept]
            .iter()
            .any(|id| *id == b.start || *id == b.accept);
        if shared {
            return Err(b.malformed());
        }
        Ok(())
    }
}
