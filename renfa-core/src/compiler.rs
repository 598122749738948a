//! AST to NFA compilation
//!
//! The [`Compiler`] walks an [`Expr`] bottom-up and calls one construction
//! operation per node, so every operand fragment is complete before the
//! operation that consumes it runs. The result is an [`Automaton`]: the
//! session arena together with its root fragment.

use crate::ast::{ClassItem, Expr, Quantifier};
use crate::dot;
use crate::error::{NfaError, RegexError, Result};
use crate::nfa::{Config, Nfa, State, StateId};
use crate::thompson::Fragment;
use crate::traverse::Bfs;
use log::debug;

/// A finished automaton
///
/// Owns every state it is made of; dropping it releases the whole graph.
#[derive(Debug)]
pub struct Automaton {
    nfa: Nfa,
    root: Fragment,
}

impl Automaton {
    /// The start state
    pub fn start(&self) -> StateId {
        self.root.start()
    }

    /// The single accepting state
    pub fn accept(&self) -> StateId {
        self.root.accept()
    }

    /// Number of states in the automaton
    pub fn state_count(&self) -> usize {
        self.root.state_count()
    }

    /// The underlying session arena
    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// Look up a state by ID
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.nfa.state(id)
    }

    /// Breadth-first walk from the start state
    pub fn bfs(&self) -> Bfs<'_> {
        self.nfa.bfs(self.start())
    }

    /// Render as a Graphviz DOT document
    pub fn to_dot(&self) -> String {
        dot::to_dot(&self.nfa, self.start())
    }

    /// Split into the arena and the root fragment
    pub fn into_parts(self) -> (Nfa, Fragment) {
        (self.nfa, self.root)
    }
}

/// Drives Thompson's construction over an AST
#[derive(Debug, Default)]
pub struct Compiler {
    nfa: Nfa,
}

impl Compiler {
    /// Create a compiler whose session uses the given settings
    pub fn new(config: Config) -> Self {
        Compiler {
            nfa: Nfa::with_config(config),
        }
    }

    /// Compile an expression into an automaton
    pub fn compile(mut self, expr: &Expr) -> Result<Automaton> {
        let root = self.build(expr)?;
        debug!(
            "compiled `{}` into {} states (start {}, accept {})",
            expr,
            root.state_count(),
            root.start(),
            root.accept()
        );
        Ok(Automaton {
            nfa: self.nfa,
            root,
        })
    }

    /// Compile an expression and return (start, accept) as a fragment
    fn build(&mut self, expr: &Expr) -> Result<Fragment> {
        match expr {
            Expr::Empty => step("epsilon", self.nfa.epsilon()),
            Expr::Literal(c) => step(format!("literal {:?}", c), self.nfa.literal(*c)),
            Expr::Any => step("any", self.nfa.any()),
            Expr::Sequence(exprs) => self.fold(exprs, "concat", Nfa::concat),
            Expr::Alternation(exprs) => self.fold(exprs, "union", Nfa::union),
            Expr::CharacterClass(items) => self.build_class(items),
            Expr::Quantified { expr, quantifier } => {
                let inner = self.build(expr)?;
                match quantifier {
                    Quantifier::ZeroOrMore => step("kleene star", self.nfa.kleene_star(inner)),
                    Quantifier::OneOrMore => step("one or more", self.nfa.one_or_more(inner)),
                    Quantifier::Optional => step("optional", self.nfa.optional(inner)),
                }
            }
            Expr::Group(inner) => self.build(inner),
        }
    }

    /// Build each expression in order, joining them left to right with `join`
    fn fold(
        &mut self,
        exprs: &[Expr],
        name: &str,
        join: fn(&mut Nfa, Fragment, Fragment) -> std::result::Result<Fragment, NfaError>,
    ) -> Result<Fragment> {
        let Some((first, rest)) = exprs.split_first() else {
            return step("epsilon", self.nfa.epsilon());
        };

        let mut acc = self.build(first)?;
        for expr in rest {
            let next = self.build(expr)?;
            acc = step(name, join(&mut self.nfa, acc, next))?;
        }
        Ok(acc)
    }

    /// A class is the union of its items
    fn build_class(&mut self, items: &[ClassItem]) -> Result<Fragment> {
        let mut acc: Option<Fragment> = None;
        for item in items {
            let next = match *item {
                ClassItem::Char(c) => step(format!("literal {:?}", c), self.nfa.literal(c))?,
                ClassItem::Range(lo, hi) => {
                    step(format!("range {:?}-{:?}", lo, hi), self.nfa.range(lo, hi))?
                }
            };
            acc = Some(match acc {
                Some(prev) => step("union", self.nfa.union(prev, next))?,
                None => next,
            });
        }
        match acc {
            Some(fragment) => Ok(fragment),
            None => step("epsilon", self.nfa.epsilon()),
        }
    }
}

/// Attach the name of the construction step to an engine error
fn step<T>(name: impl Into<String>, result: std::result::Result<T, NfaError>) -> Result<T> {
    result.map_err(|source| RegexError::Build {
        step: name.into(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn compile(pattern: &str) -> Automaton {
        Compiler::default().compile(&parse(pattern).unwrap()).unwrap()
    }

    #[test]
    fn test_compile_literal() {
        let automaton = compile("a");
        assert_eq!(automaton.state_count(), 2);
        assert_eq!((automaton.start(), automaton.accept()), (0, 1));
    }

    #[test]
    fn test_compile_sequence() {
        let automaton = compile("abc");
        assert_eq!(automaton.state_count(), 6);
        assert_eq!(automaton.start(), 0);
        assert_eq!(automaton.accept(), 5);
    }

    #[test]
    fn test_compile_alternation() {
        // (a|b) then |c: 2 + 2 + 2, then + 2 + 2
        let automaton = compile("a|b|c");
        assert_eq!(automaton.state_count(), 10);
    }

    #[test]
    fn test_compile_quantifiers() {
        assert_eq!(compile("a*").state_count(), 4);
        assert_eq!(compile("a+").state_count(), 4);
        assert_eq!(compile("a?").state_count(), 4);
        assert_eq!(compile("a*?").state_count(), 6);
    }

    #[test]
    fn test_compile_empty() {
        let automaton = compile("");
        assert_eq!(automaton.state_count(), 2);
        assert!(automaton.state(automaton.start()).unwrap().transitions()[0]
            .symbol
            .is_epsilon());
    }

    #[test]
    fn test_compile_class() {
        // [a-c_] = union(range, literal)
        let automaton = compile("[a-c_]");
        assert_eq!(automaton.state_count(), 6);
    }

    #[test]
    fn test_group_adds_no_states() {
        assert_eq!(compile("((a))").state_count(), 2);
    }

    #[test]
    fn test_every_state_belongs_to_root() {
        let automaton = compile("(a|b)*c+[x-z]?.");
        assert_eq!(automaton.state_count(), automaton.nfa().len());
        assert_eq!(automaton.bfs().count(), automaton.state_count());
    }

    #[test]
    fn test_inverted_range_reports_step() {
        let err = Compiler::default()
            .compile(&parse("a[z-a]").unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            RegexError::Build {
                step: "range 'z'-'a'".to_string(),
                source: NfaError::InvalidRange { lo: 'z', hi: 'a' },
            }
        );
    }

    #[test]
    fn test_state_limit_reports_step() {
        let compiler = Compiler::new(Config::new().state_limit(Some(4)));
        let err = compiler.compile(&parse("a|b").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            RegexError::Build {
                ref step,
                source: NfaError::AllocationFailure { .. },
            } if step == "union"
        ));
    }

    #[test]
    fn test_into_parts() {
        let (nfa, root) = compile("ab").into_parts();
        assert_eq!(nfa.len(), root.state_count());
        assert!(nfa.state(root.accept()).unwrap().is_accepting());
    }
}
