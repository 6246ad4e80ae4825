//! Emergency circuit pools.
//!
//! Hand-authored circuits used whenever the external generator fails or its
//! output keeps getting rejected. Every entry is self-consistent and passes
//! the diversity checks by construction; `fixtures_test.rs` enforces that
//! for the whole pool.

use std::collections::BTreeMap;

use rand::Rng;

use super::{
    CircuitData, CircuitDescriptor, CircuitRow, ComplexityType, Difficulty, GateType,
    PatternComponents,
};

/// Supply a known-good circuit for the given tier and difficulty.
///
/// Total: picks one of the pool entries at random and never fails.
pub fn supply(complexity: ComplexityType, difficulty: Difficulty) -> CircuitDescriptor {
    let mut pool = pool_for(complexity, difficulty);
    let index = rand::thread_rng().gen_range(0..pool.len());
    pool.swap_remove(index)
}

/// Every hand-authored circuit for a tier/difficulty combination.
///
/// Exposed for the fixture tests; gameplay goes through [`supply`].
pub fn pool_for(complexity: ComplexityType, difficulty: Difficulty) -> Vec<CircuitDescriptor> {
    match complexity {
        ComplexityType::SingleOutput => single_output_pool(difficulty),
        ComplexityType::MultipleCases => multiple_cases_pool(difficulty),
        ComplexityType::PatternAnalysis => pattern_analysis_pool(difficulty),
    }
}

fn row(values: &[u8], output: u8) -> CircuitRow {
    CircuitRow::new(values.to_vec(), output)
}

fn single(
    difficulty: Difficulty,
    pattern: Vec<GateType>,
    rows: Vec<CircuitRow>,
    expected: u8,
) -> CircuitDescriptor {
    CircuitDescriptor {
        pattern,
        difficulty,
        question: "Evaluate each gate in order. What is the final output?".to_string(),
        data: CircuitData::SingleOutput {
            input_values: rows,
            expected_output: expected,
        },
    }
}

fn single_output_pool(difficulty: Difficulty) -> Vec<CircuitDescriptor> {
    use GateType::*;
    match difficulty {
        Difficulty::Easy => vec![
            single(
                difficulty,
                vec![Xor, Nand],
                vec![row(&[1, 0], 1), row(&[1, 1], 0)],
                0,
            ),
            single(
                difficulty,
                vec![Nor, Xnor],
                vec![row(&[0, 0], 1), row(&[1, 0], 0)],
                0,
            ),
            single(
                difficulty,
                vec![Or, Xor],
                vec![row(&[0, 1], 1), row(&[1, 0], 1)],
                1,
            ),
        ],
        Difficulty::Medium => vec![
            single(
                difficulty,
                vec![And, Xor, Nor],
                vec![row(&[1, 1, 1], 1), row(&[1, 0, 1], 0), row(&[0, 0, 1], 0)],
                0,
            ),
            single(
                difficulty,
                vec![Nand, Or, Xnor],
                vec![row(&[1, 1, 0], 1), row(&[0, 0, 1], 1), row(&[1, 0, 1], 1)],
                1,
            ),
            single(
                difficulty,
                vec![Xor, Not, And],
                vec![row(&[1, 1, 0], 0), row(&[0], 1), row(&[1, 1, 1], 1)],
                1,
            ),
        ],
        Difficulty::Hard => vec![
            single(
                difficulty,
                vec![Xor, Nand, Or, Xnor],
                vec![
                    row(&[1, 0, 1, 1], 1),
                    row(&[1, 1, 1, 1], 0),
                    row(&[0, 0, 0, 1], 1),
                    row(&[1, 1, 0, 0], 1),
                ],
                1,
            ),
            single(
                difficulty,
                vec![Nor, And, Xor, Not],
                vec![
                    row(&[0, 0, 0, 0], 1),
                    row(&[1, 1, 1, 0], 0),
                    row(&[1, 1, 0, 1], 1),
                    row(&[1], 0),
                ],
                0,
            ),
            single(
                difficulty,
                vec![Or, Xnor, Nand, Xor],
                vec![
                    row(&[0, 1, 0, 0], 1),
                    row(&[1, 0, 1, 0], 1),
                    row(&[1, 1, 1, 1], 0),
                    row(&[0, 1, 1, 1], 1),
                ],
                1,
            ),
        ],
    }
}

fn multi(
    difficulty: Difficulty,
    pattern: Vec<GateType>,
    cases: Vec<(&str, Vec<CircuitRow>, u8)>,
) -> CircuitDescriptor {
    let mut test_cases = BTreeMap::new();
    let mut expected_output = BTreeMap::new();
    for (id, rows, expected) in cases {
        test_cases.insert(id.to_string(), rows);
        expected_output.insert(id.to_string(), expected);
    }
    CircuitDescriptor {
        pattern,
        difficulty,
        question: "Evaluate the circuit for every test case. What is each final output?"
            .to_string(),
        data: CircuitData::MultipleCases {
            test_cases,
            expected_output,
        },
    }
}

fn multiple_cases_pool(difficulty: Difficulty) -> Vec<CircuitDescriptor> {
    use GateType::*;
    match difficulty {
        Difficulty::Easy => vec![
            multi(
                difficulty,
                vec![And, Xor],
                vec![
                    ("case1", vec![row(&[1, 1], 1), row(&[1, 0], 1)], 1),
                    ("case2", vec![row(&[0, 1], 0), row(&[1, 1], 0)], 0),
                    ("case3", vec![row(&[1, 1], 1), row(&[0, 0], 0)], 0),
                ],
            ),
            multi(
                difficulty,
                vec![Nor, Or],
                vec![
                    ("case1", vec![row(&[0, 0], 1), row(&[0, 0], 0)], 0),
                    ("case2", vec![row(&[0, 1], 0), row(&[1, 0], 1)], 1),
                    ("case3", vec![row(&[1, 1], 0), row(&[1, 1], 1)], 1),
                ],
            ),
        ],
        Difficulty::Medium => vec![
            multi(
                difficulty,
                vec![Nand, Xor, Or],
                vec![
                    (
                        "case1",
                        vec![row(&[1, 1, 1], 0), row(&[1, 1, 0], 0), row(&[0, 0, 0], 0)],
                        0,
                    ),
                    (
                        "case2",
                        vec![row(&[1, 0, 1], 1), row(&[1, 1, 1], 1), row(&[0, 1, 0], 1)],
                        1,
                    ),
                    (
                        "case3",
                        vec![row(&[0, 0, 1], 1), row(&[1, 0, 0], 1), row(&[1, 1, 0], 1)],
                        1,
                    ),
                ],
            ),
            multi(
                difficulty,
                vec![Xnor, And, Not],
                vec![
                    (
                        "case1",
                        vec![row(&[1, 1, 0], 1), row(&[1, 1, 1], 1), row(&[0], 1)],
                        1,
                    ),
                    (
                        "case2",
                        vec![row(&[1, 0, 0], 0), row(&[0, 1, 1], 0), row(&[1], 0)],
                        0,
                    ),
                    (
                        "case3",
                        vec![row(&[0, 0, 0], 1), row(&[1, 1, 0], 0), row(&[0], 1)],
                        1,
                    ),
                ],
            ),
        ],
        Difficulty::Hard => vec![
            multi(
                difficulty,
                vec![Xor, Nor, Nand, Xnor],
                vec![
                    (
                        "case1",
                        vec![
                            row(&[1, 1, 0, 0], 0),
                            row(&[0, 0, 0, 0], 1),
                            row(&[1, 1, 1, 1], 0),
                            row(&[1, 0, 1, 0], 1),
                        ],
                        1,
                    ),
                    (
                        "case2",
                        vec![
                            row(&[1, 0, 0, 0], 1),
                            row(&[0, 1, 0, 0], 0),
                            row(&[1, 0, 1, 1], 1),
                            row(&[1, 1, 1, 0], 0),
                        ],
                        0,
                    ),
                    (
                        "case3",
                        vec![
                            row(&[1, 1, 1, 0], 1),
                            row(&[0, 0, 1, 0], 0),
                            row(&[0, 1, 1, 1], 1),
                            row(&[1, 1, 1, 1], 1),
                        ],
                        1,
                    ),
                ],
            ),
            multi(
                difficulty,
                vec![Or, Xor, Not, And],
                vec![
                    (
                        "case1",
                        vec![
                            row(&[0, 0, 0, 1], 1),
                            row(&[1, 1, 0, 1], 1),
                            row(&[1], 0),
                            row(&[1, 1, 1, 1], 1),
                        ],
                        1,
                    ),
                    (
                        "case2",
                        vec![
                            row(&[1, 0, 0, 0], 1),
                            row(&[1, 1, 1, 1], 0),
                            row(&[0], 1),
                            row(&[1, 0, 1, 1], 0),
                        ],
                        0,
                    ),
                    (
                        "case3",
                        vec![
                            row(&[0, 1, 1, 0], 1),
                            row(&[1, 0, 0, 0], 1),
                            row(&[1], 0),
                            row(&[1, 1, 0, 1], 0),
                        ],
                        0,
                    ),
                ],
            ),
        ],
    }
}

fn sequence(
    difficulty: Difficulty,
    pattern: Vec<GateType>,
    seed: Vec<u8>,
    output: Vec<u8>,
    cycle_length: usize,
    final_state: u8,
) -> CircuitDescriptor {
    CircuitDescriptor {
        pattern,
        difficulty,
        question: "The gates are applied cyclically over a sliding window. \
                   Give the output sequence, its cycle length, and its final state."
            .to_string(),
        data: CircuitData::PatternAnalysis {
            seed,
            expected_output: PatternComponents {
                pattern: output,
                cycle_length,
                final_state,
            },
        },
    }
}

fn pattern_analysis_pool(difficulty: Difficulty) -> Vec<CircuitDescriptor> {
    use GateType::*;
    match difficulty {
        Difficulty::Easy => vec![
            sequence(
                difficulty,
                vec![Xor, Or],
                vec![1, 0],
                vec![1, 1, 0, 1, 1, 1, 0, 1],
                4,
                1,
            ),
            sequence(
                difficulty,
                vec![Nand, Xor],
                vec![0, 1],
                vec![1, 0, 1, 1, 0, 1, 1, 0],
                3,
                0,
            ),
        ],
        Difficulty::Medium => vec![
            sequence(
                difficulty,
                vec![Xor, And, Or],
                vec![1, 0, 1],
                vec![0, 0, 1, 1, 0, 1, 0, 0],
                6,
                0,
            ),
            sequence(
                difficulty,
                vec![Nor, Xnor, Not],
                vec![0, 1, 1],
                vec![0, 1, 0, 0, 0, 1, 0, 0],
                4,
                0,
            ),
        ],
        Difficulty::Hard => vec![
            sequence(
                difficulty,
                vec![Xor, Nand, Or, Xnor],
                vec![1, 0, 0, 1],
                vec![0, 1, 1, 0, 0, 1, 1, 1],
                8,
                1,
            ),
            sequence(
                difficulty,
                vec![Not, Xor, Nor, And],
                vec![1, 1, 0, 1],
                vec![0, 0, 0, 0, 1, 1, 0, 0],
                6,
                0,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_matches_requested_shape() {
        for complexity in [
            ComplexityType::SingleOutput,
            ComplexityType::MultipleCases,
            ComplexityType::PatternAnalysis,
        ] {
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let circuit = supply(complexity, difficulty);
                assert_eq!(circuit.complexity_type(), complexity);
                assert_eq!(circuit.difficulty, difficulty);
                assert!(!circuit.question.is_empty());
            }
        }
    }

    #[test]
    fn test_pools_have_spares() {
        // At least two alternatives everywhere, so repeated fallbacks
        // don't always serve the same round.
        for complexity in [
            ComplexityType::SingleOutput,
            ComplexityType::MultipleCases,
            ComplexityType::PatternAnalysis,
        ] {
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                assert!(pool_for(complexity, difficulty).len() >= 2);
            }
        }
    }
}
