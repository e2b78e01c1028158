/* Closure properties of regular languages over DFAs.
 *
 * Union and intersection use the product construction: the new automaton runs both inputs in
 * lockstep over pair states. Complement only flips the accept set and shares everything else.
 * Difference is intersection with a complement.
 *
 * Products are never pruned or minimized, so chaining operations multiplies state counts. */

use crate::dfa::{DFAError, InvalidReason, Operand, TransitionFn, DFA};
use crate::fa::{State, Symbol, FA};
use crate::set;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// DFA recognizing `L(first) ∪ L(second)`. A pair state accepts if either component accepts.
pub fn union<S: State, T: State>(
    first: &DFA<S>,
    second: &DFA<T>,
) -> Result<DFA<(S, T)>, DFAError> {
    check_alphabets(first, second)?;

    let accept_by_first =
        set::cartesian_product(first.get_accept_states(), second.get_state_set());
    let accept_by_second =
        set::cartesian_product(first.get_state_set(), second.get_accept_states());
    let accept_states = accept_by_first.union(&accept_by_second).cloned().collect();

    let result = product(first, second, accept_states)?;
    debug!(states = result.get_num_states(), "union constructed");
    Ok(result)
}

/// DFA recognizing `L(first) ∩ L(second)`. A pair state accepts only if both components accept.
pub fn intersection<S: State, T: State>(
    first: &DFA<S>,
    second: &DFA<T>,
) -> Result<DFA<(S, T)>, DFAError> {
    check_alphabets(first, second)?;

    let accept_states =
        set::cartesian_product(first.get_accept_states(), second.get_accept_states());

    let result = product(first, second, accept_states)?;
    debug!(states = result.get_num_states(), "intersection constructed");
    Ok(result)
}

/// DFA recognizing every string over the alphabet that `dfa` rejects. Relies on the transition
/// function being total, which construction guarantees.
pub fn complement<S: State>(dfa: &DFA<S>) -> Result<DFA<S>, DFAError> {
    let accept_states = set::difference(dfa.get_state_set(), dfa.get_accept_states());

    let result = DFA::from_parts(
        dfa.shared_states(),
        dfa.shared_alphabet(),
        dfa.shared_transition(),
        dfa.get_start_state().clone(),
        Arc::new(accept_states),
    );

    if let Err(reason) = result.validate() {
        warn!(%reason, "complement of an automaton that no longer validates");
        return Err(DFAError::InvalidOperand {
            operand: Operand::First,
            reason,
        });
    }

    debug!(
        accept_states = result.get_accept_states().len(),
        "complement constructed"
    );
    Ok(result)
}

/// DFA recognizing `L(first) − L(second)`, built as `first ∩ complement(second)`.
pub fn difference<S: State, T: State>(
    first: &DFA<S>,
    second: &DFA<T>,
) -> Result<DFA<(S, T)>, DFAError> {
    check_alphabets(first, second)?;

    let second_complement = complement(second).map_err(|err| as_operand(err, Operand::Second))?;
    intersection(first, &second_complement)
}

impl<S: State> DFA<S> {
    pub fn union<T: State>(&self, other: &DFA<T>) -> Result<DFA<(S, T)>, DFAError> {
        union(self, other)
    }

    pub fn intersection<T: State>(&self, other: &DFA<T>) -> Result<DFA<(S, T)>, DFAError> {
        intersection(self, other)
    }

    pub fn complement(&self) -> Result<DFA<S>, DFAError> {
        complement(self)
    }

    pub fn difference<T: State>(&self, other: &DFA<T>) -> Result<DFA<(S, T)>, DFAError> {
        difference(self, other)
    }
}

fn check_alphabets<S: State, T: State>(first: &DFA<S>, second: &DFA<T>) -> Result<(), DFAError> {
    if set::set_equal(first.get_alphabet(), second.get_alphabet()) {
        Ok(())
    } else {
        Err(DFAError::AlphabetMismatch)
    }
}

fn as_operand(err: DFAError, operand: Operand) -> DFAError {
    match err {
        DFAError::InvalidAutomaton(reason) | DFAError::InvalidOperand { reason, .. } => {
            DFAError::InvalidOperand { operand, reason }
        }
        other => other,
    }
}

/// Product automaton over `first.states × second.states` with the given accept set. The result
/// is validated here, once; when that fails the offending input is identified.
fn product<S: State, T: State>(
    first: &DFA<S>,
    second: &DFA<T>,
    accept_states: HashSet<(S, T)>,
) -> Result<DFA<(S, T)>, DFAError> {
    let states = set::cartesian_product(first.get_state_set(), second.get_state_set());

    let first_transition = first.shared_transition();
    let second_transition = second.shared_transition();
    let transition: Arc<TransitionFn<(S, T)>> =
        Arc::new(move |state: &(S, T), symbol: Symbol| {
            let (p, q) = state;
            Some((first_transition(p, symbol)?, second_transition(q, symbol)?))
        });

    let start_state = (
        first.get_start_state().clone(),
        second.get_start_state().clone(),
    );

    let result = DFA::from_parts(
        Arc::new(states),
        first.shared_alphabet(),
        transition,
        start_state,
        Arc::new(accept_states),
    );

    match result.validate() {
        Ok(()) => Ok(result),
        Err(reason) => Err(attribute_failure(first, second, reason)),
    }
}

fn attribute_failure<S: State, T: State>(
    first: &DFA<S>,
    second: &DFA<T>,
    reason: InvalidReason,
) -> DFAError {
    warn!(%reason, "product automaton failed validation, re-checking operands");
    if let Err(reason) = first.validate() {
        return DFAError::InvalidOperand {
            operand: Operand::First,
            reason,
        };
    }
    if let Err(reason) = second.validate() {
        return DFAError::InvalidOperand {
            operand: Operand::Second,
            reason,
        };
    }
    DFAError::InvalidAutomaton(reason)
}

#[cfg(test)]
mod closure_tests {
    use super::*;
    use crate::set::parse_alphabet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Counts occurrences of `symbol` modulo 2, accepting when the parity matches `accept_even`.
    fn parity(symbol: Symbol, accept_even: bool) -> DFA<bool> {
        DFA::new(
            [true, false].into_iter().collect(),
            parse_alphabet(["0", "1"]).unwrap(),
            move |even: &bool, read| if read == symbol { !even } else { *even },
            true,
            [accept_even].into_iter().collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_product_state_count() {
        let even_ones = parity('1', true);
        let odd_zeros = parity('0', false);

        let union = even_ones.union(&odd_zeros).unwrap();
        assert_eq!(union.get_num_states(), 4);
        assert_eq!(union.get_accept_states().len(), 3);
        assert_eq!(union.get_start_state(), &(true, true));

        let intersection = even_ones.intersection(&odd_zeros).unwrap();
        assert_eq!(intersection.get_num_states(), 4);
        assert_eq!(intersection.get_accept_states().len(), 1);
        assert!(intersection.is_accept_state(&(true, false)));
    }

    #[test]
    fn test_chained_products_multiply_states() {
        let even_ones = parity('1', true);
        let even_zeros = parity('0', true);

        let chained = even_ones
            .union(&even_zeros)
            .unwrap()
            .intersection(&even_ones)
            .unwrap();

        assert_eq!(chained.get_num_states(), 8);
    }

    #[test]
    fn test_alphabet_mismatch() {
        let binary = parity('1', true);
        let ternary = DFA::new(
            [0u8].into_iter().collect(),
            parse_alphabet(["0", "1", "2"]).unwrap(),
            |state: &u8, _| *state,
            0,
            HashSet::new(),
        )
        .unwrap();

        assert_eq!(
            binary.union(&ternary).unwrap_err(),
            DFAError::AlphabetMismatch
        );
        assert_eq!(
            binary.intersection(&ternary).unwrap_err(),
            DFAError::AlphabetMismatch
        );
        assert_eq!(
            binary.difference(&ternary).unwrap_err(),
            DFAError::AlphabetMismatch
        );
    }

    #[test]
    fn test_complement_shares_structure() {
        let even_ones = parity('1', true);
        let complement = even_ones.complement().unwrap();

        assert!(Arc::ptr_eq(
            &even_ones.shared_states(),
            &complement.shared_states()
        ));
        assert!(Arc::ptr_eq(
            &even_ones.shared_transition(),
            &complement.shared_transition()
        ));
        let expected: HashSet<bool> = [false].into_iter().collect();
        assert_eq!(complement.get_accept_states(), &expected);
        assert!(!complement.simulate("").unwrap());
        assert!(complement.simulate("1").unwrap());
    }

    #[test]
    fn test_complement_of_everything_accepts_nothing() {
        let everything = DFA::new(
            ["all"].into_iter().collect(),
            parse_alphabet(["0", "1"]).unwrap(),
            |state: &&str, _| *state,
            "all",
            ["all"].into_iter().collect(),
        )
        .unwrap();

        let nothing = everything.complement().unwrap();
        assert!(nothing.get_accept_states().is_empty());
        assert!(!nothing.simulate("").unwrap());
        assert!(!nothing.simulate("0110").unwrap());
    }

    // A transition rule that behaves during construction and then starts leaving the state set.
    fn decaying(calls_before_decay: usize) -> DFA<u8> {
        let calls = Arc::new(AtomicUsize::new(0));
        DFA::new(
            [0u8, 1].into_iter().collect(),
            parse_alphabet(["0", "1"]).unwrap(),
            move |state: &u8, _| {
                if calls.fetch_add(1, Ordering::SeqCst) < calls_before_decay {
                    *state
                } else {
                    9
                }
            },
            0,
            [0].into_iter().collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_operand_is_attributed() {
        let stable = parity('1', true);

        let err = decaying(4).intersection(&stable).unwrap_err();
        match err {
            DFAError::InvalidOperand { operand, reason } => {
                assert_eq!(operand, Operand::First);
                assert!(matches!(
                    reason,
                    InvalidReason::TransitionOutsideStates { .. }
                ));
            }
            _ => panic!("Expected the first operand to be reported"),
        }

        let err = stable.union(&decaying(4)).unwrap_err();
        assert!(matches!(
            err,
            DFAError::InvalidOperand {
                operand: Operand::Second,
                ..
            }
        ));
    }

    #[test]
    fn test_difference_reports_second_operand() {
        let stable = parity('1', true);

        let err = stable.difference(&decaying(4)).unwrap_err();
        assert!(matches!(
            err,
            DFAError::InvalidOperand {
                operand: Operand::Second,
                ..
            }
        ));
    }
}
