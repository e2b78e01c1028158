use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::dot::Dot;
use petgraph::{graph::EdgeIndex, graph::NodeIndex, prelude::StableGraph};

use crate::fa::FA;

fn node_label<T: FA>(fa: &T, state: &T::State) -> String {
    let mut label = String::new();
    if state == fa.get_start_state() {
        label.push_str("Start\n");
    }
    if fa.is_accept_state(state) {
        label.push_str("Accept\n");
    }
    label.push_str(&format!("{:?}", state));
    label
}

/// States reachable from the start come first, in breadth first order, followed by the rest.
fn ordered_states<T: FA>(fa: &T) -> Vec<T::State> {
    let mut seen: HashSet<T::State> = HashSet::new();
    let mut ordered = Vec::new();
    let mut queue: VecDeque<T::State> = VecDeque::new();

    let start = fa.get_start_state().clone();
    seen.insert(start.clone());
    queue.push_back(start);

    while let Some(state) = queue.pop_front() {
        for (_, target) in fa.get_state_transitions(&state) {
            if seen.insert(target.clone()) {
                queue.push_back(target);
            }
        }
        ordered.push(state);
    }

    for state in fa.get_states() {
        if seen.insert(state.clone()) {
            ordered.push(state);
        }
    }

    ordered
}

fn generate_stable_graph<T: FA>(fa: &T) -> StableGraph<String, String> {
    let mut stable_graph = StableGraph::new();

    let mut node_map: HashMap<T::State, NodeIndex> = HashMap::new();
    let mut edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();

    let states = ordered_states(fa);

    // Add all nodes

    for state in states.iter() {
        let node = stable_graph.add_node(node_label(fa, state));
        node_map.insert(state.clone(), node);
    }

    // Add all edges, parallel transitions share one edge with a merged label

    for state in states.iter() {
        let Some(&source) = node_map.get(state) else {
            continue;
        };

        for (symbol, target) in fa.get_state_transitions(state) {
            let Some(&target) = node_map.get(&target) else {
                continue;
            };

            match edge_map.get(&(source, target)) {
                Some(&edge_idx) => {
                    let old_label = &stable_graph[edge_idx];
                    let new_label = format!("{}, {}", old_label, symbol);
                    stable_graph[edge_idx] = new_label;
                }
                None => {
                    let edge_idx = stable_graph.add_edge(source, target, symbol.to_string());
                    edge_map.insert((source, target), edge_idx);
                }
            }
        }
    }

    stable_graph
}

/// Render the finite automaton provided in Graphviz DOT format
pub fn to_dot<T: FA>(fa: &T) -> String {
    let graph = generate_stable_graph(fa);
    Dot::new(&graph).to_string()
}
