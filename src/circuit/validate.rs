//! Diversity checks on generated circuits.
//!
//! The generator is an external model whose output cannot be trusted to be
//! pedagogically meaningful. These checks reject degenerate circuits before
//! a player ever sees them; internal consistency is the simulator's job and
//! both must pass before acceptance.

use std::collections::HashSet;

use super::{CircuitData, CircuitDescriptor, CircuitRow, GateType};
use crate::error::ValidationRejection;

/// Check a circuit for the variety the game needs.
pub fn validate(circuit: &CircuitDescriptor) -> Result<(), ValidationRejection> {
    let pattern = &circuit.pattern;

    if pattern.len() > 1 {
        let distinct: HashSet<GateType> = pattern.iter().copied().collect();
        if distinct.len() < 2 {
            return Err(ValidationRejection::UniformPattern);
        }
    }

    match &circuit.data {
        CircuitData::SingleOutput { input_values, .. } => {
            if pattern.len() > 1
                && pattern
                    .iter()
                    .all(|g| matches!(g, GateType::And | GateType::Or))
            {
                return Err(ValidationRejection::TrivialGatePattern);
            }
            if all_rows_identical(input_values) {
                return Err(ValidationRejection::IdenticalInputRows);
            }
        }
        CircuitData::MultipleCases {
            test_cases,
            expected_output,
        } => {
            let distinct: HashSet<u8> = expected_output.values().copied().collect();
            if distinct.len() < 2 {
                return Err(ValidationRejection::InsufficientCaseVariety);
            }
            let mut case_inputs = test_cases.values().map(|rows| {
                rows.iter()
                    .map(|r| r.inputs.clone())
                    .collect::<Vec<_>>()
            });
            if let Some(first) = case_inputs.next() {
                if test_cases.len() > 1 && case_inputs.all(|inputs| inputs == first) {
                    return Err(ValidationRejection::IdenticalCaseInputs);
                }
            }
        }
        CircuitData::PatternAnalysis {
            expected_output, ..
        } => {
            if expected_output.pattern.len() < 6 {
                return Err(ValidationRejection::PatternTooShort {
                    len: expected_output.pattern.len(),
                });
            }
            let distinct: HashSet<u8> = expected_output.pattern.iter().copied().collect();
            if distinct.len() < 2 {
                return Err(ValidationRejection::InsufficientPatternVariety);
            }
        }
    }

    Ok(())
}

fn all_rows_identical(rows: &[CircuitRow]) -> bool {
    if rows.len() < 2 {
        return false;
    }
    rows.windows(2).all(|w| w[0].inputs == w[1].inputs)
}
