/* Index based snapshot of a DFA. Any DFA, including the pair-state automata built by the closure
 * operations, can be flattened into a table of integer states, saved as JSON and loaded back as a
 * validated DFA over usize states. */

use crate::dfa::DFA;
use crate::fa::{State, Symbol, FA};
use bitvec::prelude::*;
use color_eyre::eyre::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DFATableState {
    #[serde(
        serialize_with = "serialize_transitions",
        deserialize_with = "deserialize_transitions"
    )]
    transitions: HashMap<Symbol, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DFATable {
    states: Vec<DFATableState>,
    start_state: usize,
    accept_states: BitVec<u8>,
    alphabet: HashSet<Symbol>,
}

fn serialize_transitions<S>(
    transitions: &HashMap<Symbol, usize>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeMap;

    let mut ser_map = serializer.serialize_map(Some(transitions.len()))?;

    for (symbol, target) in transitions {
        ser_map.serialize_entry(&symbol.to_string(), target)?;
    }
    ser_map.end()
}

fn deserialize_transitions<'de, D>(deserializer: D) -> Result<HashMap<Symbol, usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let transitions: HashMap<String, usize> = HashMap::deserialize(deserializer)?;

    let mut result = HashMap::new();

    for (key, target) in transitions {
        let mut chars = key.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => {
                return Err(serde::de::Error::custom(format!(
                    "Invalid transition symbol: {:?}",
                    key
                )))
            }
        };
        result.insert(symbol, target);
    }

    Ok(result)
}

impl DFATableState {
    fn new() -> Self {
        DFATableState {
            transitions: HashMap::new(),
        }
    }

    /// Get all outgoing transitions of this state
    pub fn get_transitions(&self) -> &HashMap<Symbol, usize> {
        &self.transitions
    }
}

impl FA for DFATable {
    type State = usize;

    fn get_num_states(&self) -> usize {
        self.states.len()
    }

    fn get_start_state(&self) -> &usize {
        &self.start_state
    }

    fn get_alphabet(&self) -> &HashSet<Symbol> {
        &self.alphabet
    }

    fn is_accept_state(&self, state: &usize) -> bool {
        self.accept_states.get(*state).is_some_and(|bit| *bit)
    }

    fn get_states(&self) -> Vec<usize> {
        (0..self.states.len()).collect()
    }

    fn get_state_transitions(&self, state: &usize) -> Vec<(Symbol, usize)> {
        let mut transitions: Vec<(Symbol, usize)> = match self.states.get(*state) {
            Some(table_state) => table_state
                .transitions
                .iter()
                .map(|(symbol, target)| (*symbol, *target))
                .collect(),
            None => Vec::new(),
        };
        transitions.sort_unstable();
        transitions
    }
}

impl DFATable {
    fn new(alphabet: HashSet<Symbol>) -> Self {
        DFATable {
            states: Vec::new(),
            start_state: 0,
            accept_states: BitVec::new(),
            alphabet,
        }
    }

    fn add_state(&mut self) -> usize {
        let state_id = self.states.len();
        self.states.push(DFATableState::new());
        self.accept_states.push(false);
        state_id
    }

    /// Returns a reference to the table state whose id is provided
    pub fn get_state(&self, id: usize) -> Option<&DFATableState> {
        self.states.get(id)
    }

    pub fn get_acceptor_states(&self) -> &BitVec<u8> {
        &self.accept_states
    }

    /// Rebuild a validated DFA over integer states from this table.
    pub fn into_dfa(self) -> Result<DFA<usize>> {
        let mut table: HashMap<(usize, Symbol), usize> = HashMap::new();
        for (state_id, state) in self.states.iter().enumerate() {
            for (symbol, target) in state.transitions.iter() {
                table.insert((state_id, *symbol), *target);
            }
        }

        let states: HashSet<usize> = (0..self.states.len()).collect();
        let accept_states: HashSet<usize> = self.accept_states.iter_ones().collect();

        let dfa = DFA::from_table(
            states,
            self.alphabet,
            table,
            self.start_state,
            accept_states,
        )?;
        Ok(dfa)
    }

    pub fn to_json(&self) -> Result<String> {
        let json_string = serde_json::to_string_pretty(self)?;
        Ok(json_string)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let table: DFATable = serde_json::from_str(json)?;
        Ok(table)
    }
}

impl<S: State> DFA<S> {
    /// Flatten the DFA into a table. States are numbered in depth first order from the start
    /// state, which becomes state 0; states unreachable from the start are left out.
    pub fn tabulate(&self) -> DFATable {
        let mut result = DFATable::new(self.get_alphabet().clone());
        let mut reorder_map: HashMap<S, usize> = HashMap::new();
        let mut stack: VecDeque<S> = VecDeque::new();

        let start_state = self.get_start_state().clone();
        result.start_state = result.add_state();
        reorder_map.insert(start_state.clone(), result.start_state);
        stack.push_front(start_state);

        while let Some(state) = stack.pop_front() {
            let Some(&state_id) = reorder_map.get(&state) else {
                continue;
            };

            if self.is_accept_state(&state) {
                result.accept_states.set(state_id, true);
            }

            for (symbol, target) in self.get_state_transitions(&state) {
                let target_id = match reorder_map.get(&target) {
                    Some(&id) => id,
                    None => {
                        let id = result.add_state();
                        reorder_map.insert(target.clone(), id);
                        stack.push_front(target);
                        id
                    }
                };
                result.states[state_id].transitions.insert(symbol, target_id);
            }
        }

        debug!(
            states = self.get_num_states(),
            reachable = result.get_num_states(),
            "tabulated DFA"
        );
        result
    }
}
