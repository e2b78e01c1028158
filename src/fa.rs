use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// Input symbols are single characters.
pub type Symbol = char;

/// Bound shared by every state representation. Homogeneity of the state set is guaranteed by the
/// type parameter itself, so a DFA can never mix, say, strings and integers as states.
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> State for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

pub trait FA {
    type State: State;

    fn get_num_states(&self) -> usize;
    fn get_start_state(&self) -> &Self::State;
    fn get_alphabet(&self) -> &HashSet<Symbol>;
    fn is_accept_state(&self, state: &Self::State) -> bool;
    fn get_states(&self) -> Vec<Self::State>;
    fn get_state_transitions(&self, state: &Self::State) -> Vec<(Symbol, Self::State)>;
}
