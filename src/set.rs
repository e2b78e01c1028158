/* Thin glue over std's HashSet for the handful of finite set operations the automata need:
 * membership, subset, equality, difference and cartesian product. Nothing here depends on
 * iteration order. */

use crate::dfa::{DFAError, InvalidReason};
use crate::fa::{State, Symbol};
use std::collections::HashSet;

/// Every ordered pair `(a, b)` with `a` drawn from `first` and `b` drawn from `second`.
pub fn cartesian_product<S: State, T: State>(
    first: &HashSet<S>,
    second: &HashSet<T>,
) -> HashSet<(S, T)> {
    let mut product = HashSet::with_capacity(first.len() * second.len());
    for a in first {
        for b in second {
            product.insert((a.clone(), b.clone()));
        }
    }
    product
}

pub fn is_subset<S: State>(subset: &HashSet<S>, superset: &HashSet<S>) -> bool {
    subset.iter().all(|elem| superset.contains(elem))
}

pub fn set_equal<S: State>(first: &HashSet<S>, second: &HashSet<S>) -> bool {
    first.len() == second.len() && is_subset(first, second)
}

pub fn difference<S: State>(first: &HashSet<S>, second: &HashSet<S>) -> HashSet<S> {
    first.difference(second).cloned().collect()
}

/// Build an alphabet out of textual symbols. Each symbol must be exactly one character long.
pub fn parse_alphabet<I, T>(symbols: I) -> Result<HashSet<Symbol>, DFAError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut alphabet = HashSet::new();
    for symbol in symbols {
        let symbol = symbol.as_ref();
        let mut chars = symbol.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => {
                alphabet.insert(ch);
            }
            _ => {
                return Err(DFAError::InvalidAutomaton(InvalidReason::MalformedSymbol(
                    symbol.to_string(),
                )))
            }
        }
    }
    Ok(alphabet)
}
