/* Deterministic finite automata over an arbitrary state type. A DFA is validated once, when it is
 * constructed, and is immutable afterwards, so it can be simulated and combined freely from any
 * number of threads. */

use crate::fa::{State, Symbol, FA};
use crate::set;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Shared transition logic. `None` marks a `(state, symbol)` pair the function does not cover.
pub(crate) type TransitionFn<S> = dyn Fn(&S, Symbol) -> Option<S> + Send + Sync;

/// The reason a DFA failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    EmptyStates,
    MalformedSymbol(String),
    StartNotInStates(String),
    AcceptNotSubset(String),
    IncompleteTransition { state: String, symbol: Symbol },
    TransitionOutsideStates {
        state: String,
        symbol: Symbol,
        target: String,
    },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::EmptyStates => write!(f, "the set of states is empty"),
            InvalidReason::MalformedSymbol(symbol) => {
                write!(f, "alphabet symbol {:?} is not a single character", symbol)
            }
            InvalidReason::StartNotInStates(start) => {
                write!(f, "start state {} is not in the set of states", start)
            }
            InvalidReason::AcceptNotSubset(state) => write!(
                f,
                "accept state {} is not in the set of states, accept states must be a subset of all states",
                state
            ),
            InvalidReason::IncompleteTransition { state, symbol } => write!(
                f,
                "incomplete transition function, no transition from {} on {:?}",
                state, symbol
            ),
            InvalidReason::TransitionOutsideStates {
                state,
                symbol,
                target,
            } => write!(
                f,
                "invalid transition function, {} on {:?} leads to {} which is not a state",
                state, symbol, target
            ),
        }
    }
}

impl std::error::Error for InvalidReason {}

/// Which input of a binary combinator an error refers to. Unary combinators report `First`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    First,
    Second,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::First => write!(f, "first"),
            Operand::Second => write!(f, "second"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DFAError {
    InvalidAutomaton(InvalidReason),
    InvalidOperand {
        operand: Operand,
        reason: InvalidReason,
    },
    AlphabetMismatch,
    SymbolNotInAlphabet { symbol: Symbol, position: usize },
}

impl fmt::Display for DFAError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DFAError::InvalidAutomaton(reason) => write!(f, "Error: Invalid DFA: {}", reason),
            DFAError::InvalidOperand { operand, reason } => {
                write!(f, "Error: Invalid DFA as {} operand: {}", operand, reason)
            }
            DFAError::AlphabetMismatch => {
                write!(f, "Error: Alphabets of the input DFAs must be equal!")
            }
            DFAError::SymbolNotInAlphabet { symbol, position } => write!(
                f,
                "Error: Symbol {:?} at position {} is not in the alphabet of the DFA",
                symbol, position
            ),
        }
    }
}

impl std::error::Error for DFAError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DFAError::InvalidAutomaton(reason) => Some(reason),
            DFAError::InvalidOperand { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<InvalidReason> for DFAError {
    fn from(reason: InvalidReason) -> Self {
        DFAError::InvalidAutomaton(reason)
    }
}

/// A deterministic finite automaton with states of type `S`.
///
/// Cloning is cheap: the state set, alphabet, accept set and transition logic are shared. DFAs
/// produced by the closure operations capture their inputs' transition logic the same way.
#[derive(Clone)]
pub struct DFA<S: State> {
    states: Arc<HashSet<S>>,
    alphabet: Arc<HashSet<Symbol>>,
    transition: Arc<TransitionFn<S>>,
    start_state: S,
    accept_states: Arc<HashSet<S>>,
}

impl<S: State> fmt::Debug for DFA<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DFA")
            .field("states", &self.states)
            .field("alphabet", &self.alphabet)
            .field("start_state", &self.start_state)
            .field("accept_states", &self.accept_states)
            .finish_non_exhaustive()
    }
}

impl<S: State> FA for DFA<S> {
    type State = S;

    fn get_num_states(&self) -> usize {
        self.states.len()
    }

    fn get_start_state(&self) -> &S {
        &self.start_state
    }

    fn get_alphabet(&self) -> &HashSet<Symbol> {
        &self.alphabet
    }

    fn is_accept_state(&self, state: &S) -> bool {
        self.accept_states.contains(state)
    }

    fn get_states(&self) -> Vec<S> {
        self.states.iter().cloned().collect()
    }

    fn get_state_transitions(&self, state: &S) -> Vec<(Symbol, S)> {
        let mut symbols: Vec<Symbol> = self.alphabet.iter().copied().collect();
        symbols.sort_unstable();
        symbols
            .into_iter()
            .filter_map(|symbol| self.transition(state, symbol).map(|next| (symbol, next)))
            .collect()
    }
}

impl<S: State> DFA<S> {
    /// Construct a DFA whose transition function is an arbitrary rule. The automaton is validated
    /// before it is returned; the rule must map every state and symbol back into `states`.
    pub fn new<F>(
        states: HashSet<S>,
        alphabet: HashSet<Symbol>,
        transition: F,
        start_state: S,
        accept_states: HashSet<S>,
    ) -> Result<Self, DFAError>
    where
        F: Fn(&S, Symbol) -> S + Send + Sync + 'static,
    {
        let transition: Arc<TransitionFn<S>> =
            Arc::new(move |state: &S, symbol| Some(transition(state, symbol)));
        Self::from_parts(
            Arc::new(states),
            Arc::new(alphabet),
            transition,
            start_state,
            Arc::new(accept_states),
        )
        .validated()
    }

    /// Construct a DFA from a literal transition table. Every pair in `states × alphabet` must
    /// have an entry, extra entries are ignored.
    pub fn from_table(
        states: HashSet<S>,
        alphabet: HashSet<Symbol>,
        table: HashMap<(S, Symbol), S>,
        start_state: S,
        accept_states: HashSet<S>,
    ) -> Result<Self, DFAError> {
        let transition: Arc<TransitionFn<S>> = Arc::new(move |state: &S, symbol| {
            table.get(&(state.clone(), symbol)).cloned()
        });
        Self::from_parts(
            Arc::new(states),
            Arc::new(alphabet),
            transition,
            start_state,
            Arc::new(accept_states),
        )
        .validated()
    }

    /// Assemble a DFA without validating it. Callers must pass the result through `validated`.
    pub(crate) fn from_parts(
        states: Arc<HashSet<S>>,
        alphabet: Arc<HashSet<Symbol>>,
        transition: Arc<TransitionFn<S>>,
        start_state: S,
        accept_states: Arc<HashSet<S>>,
    ) -> Self {
        DFA {
            states,
            alphabet,
            transition,
            start_state,
            accept_states,
        }
    }

    pub(crate) fn validated(self) -> Result<Self, DFAError> {
        self.validate()?;
        debug!(
            states = self.states.len(),
            symbols = self.alphabet.len(),
            accept_states = self.accept_states.len(),
            "constructed DFA"
        );
        Ok(self)
    }

    /// Check every structural invariant of the DFA and report the first violation found.
    pub fn check(&self) -> Result<(), DFAError> {
        self.validate().map_err(DFAError::InvalidAutomaton)
    }

    pub(crate) fn validate(&self) -> Result<(), InvalidReason> {
        // State homogeneity is enforced by `S`, and `Symbol` is a char so every alphabet symbol
        // is a single character.
        if self.states.is_empty() {
            return Err(InvalidReason::EmptyStates);
        }

        if !self.states.contains(&self.start_state) {
            return Err(InvalidReason::StartNotInStates(format!(
                "{:?}",
                self.start_state
            )));
        }

        if !set::is_subset(&self.accept_states, &self.states) {
            let outside = self
                .accept_states
                .iter()
                .find(|state| !self.states.contains(*state))
                .map(|state| format!("{:?}", state))
                .unwrap_or_default();
            return Err(InvalidReason::AcceptNotSubset(outside));
        }

        for state in self.states.iter() {
            for &symbol in self.alphabet.iter() {
                match self.transition(state, symbol) {
                    None => {
                        return Err(InvalidReason::IncompleteTransition {
                            state: format!("{:?}", state),
                            symbol,
                        })
                    }
                    Some(target) if !self.states.contains(&target) => {
                        return Err(InvalidReason::TransitionOutsideStates {
                            state: format!("{:?}", state),
                            symbol,
                            target: format!("{:?}", target),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }

    /// Run the DFA on `input` and report whether it ends in an accept state. Fails as soon as a
    /// character outside the alphabet is read.
    pub fn simulate(&self, input: &str) -> Result<bool, DFAError> {
        self.simulate_symbols(input.chars())
    }

    pub fn simulate_symbols<I>(&self, input: I) -> Result<bool, DFAError>
    where
        I: IntoIterator<Item = Symbol>,
    {
        let mut current_state = self.start_state.clone();

        for (position, symbol) in input.into_iter().enumerate() {
            if !self.alphabet.contains(&symbol) {
                return Err(DFAError::SymbolNotInAlphabet { symbol, position });
            }
            let next_state = self.transition(&current_state, symbol).ok_or_else(|| {
                DFAError::InvalidAutomaton(InvalidReason::IncompleteTransition {
                    state: format!("{:?}", current_state),
                    symbol,
                })
            })?;
            trace!(from = ?current_state, to = ?next_state, %symbol, "step");
            current_state = next_state;
        }

        Ok(self.accept_states.contains(&current_state))
    }

    /// Apply the transition function once.
    pub fn transition(&self, state: &S, symbol: Symbol) -> Option<S> {
        (self.transition)(state, symbol)
    }

    pub fn get_state_set(&self) -> &HashSet<S> {
        &self.states
    }

    pub fn get_accept_states(&self) -> &HashSet<S> {
        &self.accept_states
    }

    pub(crate) fn shared_states(&self) -> Arc<HashSet<S>> {
        Arc::clone(&self.states)
    }

    pub(crate) fn shared_alphabet(&self) -> Arc<HashSet<Symbol>> {
        Arc::clone(&self.alphabet)
    }

    pub(crate) fn shared_transition(&self) -> Arc<TransitionFn<S>> {
        Arc::clone(&self.transition)
    }
}
