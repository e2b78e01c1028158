//! # dfa-closure
//!
//! A small library for experimenting with deterministic finite automata from computability
//! theory.
//!
//! This library provides functionality to:
//! - Construct DFAs over any hashable state type, validated at construction
//! - Simulate a DFA on an input string
//! - Combine DFAs using the closure properties of regular languages: union, intersection,
//!   complement and difference
//! - Flatten a DFA into an integer state table that can be saved and loaded as JSON
//! - Render an automaton in Graphviz DOT format

// Re-export the modules
pub mod closure;
pub mod dfa;
pub mod fa;
pub mod set;
pub mod table;
pub mod visualizer;

// Re-export commonly used items for convenience
pub use closure::{complement, difference, intersection, union};
pub use dfa::{DFAError, InvalidReason, Operand, DFA};
pub use fa::{State, Symbol, FA};
pub use set::parse_alphabet;
pub use table::DFATable;
pub use visualizer::to_dot;
