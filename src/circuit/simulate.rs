//! Replay-based consistency checking of circuit data.
//!
//! A circuit descriptor arrives with recorded outputs the generator claims
//! are correct. The simulator recomputes every one of them with the gate
//! evaluator and reports mismatches. It is advisory: an inconsistent
//! circuit is rejected by the engine, but an empty one degrades gracefully
//! instead of failing, since the validator is the hard gate.

use serde::Serialize;

use super::{evaluate, generate_sequence, smallest_period, CircuitData, CircuitDescriptor};

/// One replayed gate application.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStep {
    /// Gate name as shown to the player.
    pub gate: String,
    /// Inputs the gate was applied to.
    pub inputs: Vec<u8>,
    /// Output recorded in the descriptor.
    pub recorded: u8,
    /// Output the evaluator computed.
    pub computed: u8,
    /// Whether recorded and computed agree.
    pub matches: bool,
}

/// Outcome of replaying a circuit against its own recorded data.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// True iff every replayed step matched its recorded output.
    pub valid: bool,
    /// Per-gate replay records.
    pub steps: Vec<SimulationStep>,
    /// Output of the last replayed step (0 when nothing was replayed).
    pub final_output: u8,
    /// Present when the report needs explaining (empty data, gate misuse,
    /// mismatched components).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SimulationReport {
    fn empty(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            steps: Vec::new(),
            final_output: 0,
            message: Some(message.into()),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            steps: Vec::new(),
            final_output: 0,
            message: Some(message.into()),
        }
    }
}

/// Replay a circuit's gate sequence and confirm its recorded outputs.
pub fn simulate(circuit: &CircuitDescriptor) -> SimulationReport {
    match &circuit.data {
        CircuitData::SingleOutput {
            input_values,
            expected_output,
        } => {
            if input_values.is_empty() {
                return SimulationReport::empty("no input rows to simulate");
            }
            let mut report = replay_rows(circuit, input_values);
            if report.valid {
                if let Some(last) = input_values.last() {
                    if last.output != *expected_output {
                        report.valid = false;
                        report.message = Some(format!(
                            "expected output {} does not match final row output {}",
                            expected_output, last.output
                        ));
                    }
                }
            }
            report
        }
        CircuitData::MultipleCases {
            test_cases,
            expected_output,
        } => {
            if test_cases.is_empty() {
                return SimulationReport::empty("no test cases to simulate");
            }
            let mut steps = Vec::new();
            let mut valid = true;
            let mut message = None;
            let mut final_output = 0;
            for (case_id, rows) in test_cases {
                let case_report = replay_rows(circuit, rows);
                valid &= case_report.valid;
                if message.is_none() {
                    message = case_report.message;
                }
                steps.extend(case_report.steps);
                final_output = case_report.final_output;
                match (rows.last(), expected_output.get(case_id)) {
                    (Some(last), Some(&expected)) if last.output != expected => {
                        valid = false;
                        message.get_or_insert(format!(
                            "{}: expected output {} does not match final row output {}",
                            case_id, expected, last.output
                        ));
                    }
                    (_, None) => {
                        valid = false;
                        message.get_or_insert(format!("{}: no expected output recorded", case_id));
                    }
                    _ => {}
                }
            }
            SimulationReport {
                valid,
                steps,
                final_output,
                message,
            }
        }
        CircuitData::PatternAnalysis {
            seed,
            expected_output,
        } => {
            let recorded = &expected_output.pattern;
            if recorded.is_empty() {
                return SimulationReport::empty("no sequence to simulate");
            }
            let computed = match generate_sequence(&circuit.pattern, seed, recorded.len()) {
                Ok(seq) => seq,
                Err(e) => return SimulationReport::invalid(e.to_string()),
            };
            // Full state lets each step report the window it consumed.
            let state: Vec<u8> = seed.iter().chain(computed.iter()).copied().collect();
            let window_size = seed.len();
            let steps: Vec<SimulationStep> = computed
                .iter()
                .zip(recorded.iter())
                .enumerate()
                .map(|(n, (&computed, &recorded))| SimulationStep {
                    gate: circuit.pattern[n % circuit.pattern.len()].to_string(),
                    inputs: state[n..n + window_size].to_vec(),
                    recorded,
                    computed,
                    matches: computed == recorded,
                })
                .collect();
            let mut valid = steps.iter().all(|s| s.matches);
            let mut message = None;
            if valid {
                let period = smallest_period(recorded);
                if expected_output.cycle_length != period {
                    valid = false;
                    message = Some(format!(
                        "recorded cycle length {} but sequence period is {}",
                        expected_output.cycle_length, period
                    ));
                } else if recorded.last() != Some(&expected_output.final_state) {
                    valid = false;
                    message = Some("final state does not match sequence".to_string());
                }
            }
            let final_output = *computed.last().unwrap_or(&0);
            SimulationReport {
                valid,
                steps,
                final_output,
                message,
            }
        }
    }
}

/// Replay one row list against the gate pattern, step by step.
fn replay_rows(
    circuit: &CircuitDescriptor,
    rows: &[super::CircuitRow],
) -> SimulationReport {
    if rows.len() != circuit.pattern.len() {
        return SimulationReport::invalid(format!(
            "{} rows recorded for {} gates",
            rows.len(),
            circuit.pattern.len()
        ));
    }
    let mut steps = Vec::with_capacity(rows.len());
    let mut valid = true;
    let mut message = None;
    let mut final_output = 0;
    for (gate, row) in circuit.pattern.iter().zip(rows) {
        let computed = match evaluate(*gate, &row.inputs) {
            Ok(v) => v,
            Err(e) => {
                valid = false;
                message.get_or_insert(e.to_string());
                // The recorded output cannot be confirmed; flag the step.
                steps.push(SimulationStep {
                    gate: gate.to_string(),
                    inputs: row.inputs.clone(),
                    recorded: row.output,
                    computed: 1 - row.output,
                    matches: false,
                });
                continue;
            }
        };
        let matches = computed == row.output;
        valid &= matches;
        final_output = computed;
        steps.push(SimulationStep {
            gate: gate.to_string(),
            inputs: row.inputs.clone(),
            recorded: row.output,
            computed,
            matches,
        });
    }
    SimulationReport {
        valid,
        steps,
        final_output,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitRow, Difficulty, GateType, PatternComponents};
    use std::collections::BTreeMap;

    fn single(rows: Vec<CircuitRow>, expected: u8) -> CircuitDescriptor {
        CircuitDescriptor {
            pattern: vec![GateType::Xor, GateType::Nand],
            difficulty: Difficulty::Easy,
            question: "What is the final output?".to_string(),
            data: CircuitData::SingleOutput {
                input_values: rows,
                expected_output: expected,
            },
        }
    }

    #[test]
    fn test_consistent_single_output_is_valid() {
        let report = simulate(&single(
            vec![
                CircuitRow::new(vec![1, 0], 1),
                CircuitRow::new(vec![1, 1], 0),
            ],
            0,
        ));
        assert!(report.valid);
        assert_eq!(report.steps.len(), 2);
        assert_eq!(report.final_output, 0);
        assert!(report.steps.iter().all(|s| s.matches));
    }

    #[test]
    fn test_inconsistent_row_is_flagged() {
        // XOR(1, 0) is 1, not 0.
        let report = simulate(&single(
            vec![
                CircuitRow::new(vec![1, 0], 0),
                CircuitRow::new(vec![1, 1], 0),
            ],
            0,
        ));
        assert!(!report.valid);
        assert!(!report.steps[0].matches);
        assert!(report.steps[1].matches);
    }

    #[test]
    fn test_expected_output_must_match_last_row() {
        let report = simulate(&single(
            vec![
                CircuitRow::new(vec![1, 0], 1),
                CircuitRow::new(vec![1, 1], 0),
            ],
            1,
        ));
        assert!(!report.valid);
        assert!(report.message.unwrap().contains("final row"));
    }

    #[test]
    fn test_empty_input_values_degrade_gracefully() {
        let report = simulate(&single(vec![], 0));
        assert!(report.valid);
        assert!(report.steps.is_empty());
        assert_eq!(report.final_output, 0);
        assert!(report.message.is_some());
    }

    #[test]
    fn test_gate_arity_error_invalidates_step() {
        let circuit = CircuitDescriptor {
            pattern: vec![GateType::Not, GateType::Xor],
            difficulty: Difficulty::Easy,
            question: "What is the final output?".to_string(),
            data: CircuitData::SingleOutput {
                input_values: vec![
                    CircuitRow::new(vec![1, 0], 0),
                    CircuitRow::new(vec![1, 1], 0),
                ],
                expected_output: 0,
            },
        };
        let report = simulate(&circuit);
        assert!(!report.valid);
        assert!(report.message.unwrap().contains("Invalid input count"));
    }

    #[test]
    fn test_multi_case_checks_every_case() {
        let mut test_cases = BTreeMap::new();
        test_cases.insert(
            "case1".to_string(),
            vec![
                CircuitRow::new(vec![1, 1], 1),
                CircuitRow::new(vec![1, 0], 1),
            ],
        );
        test_cases.insert(
            "case2".to_string(),
            vec![
                CircuitRow::new(vec![0, 1], 0),
                CircuitRow::new(vec![1, 1], 0),
            ],
        );
        let mut expected_output = BTreeMap::new();
        expected_output.insert("case1".to_string(), 1);
        expected_output.insert("case2".to_string(), 0);

        let circuit = CircuitDescriptor {
            pattern: vec![GateType::And, GateType::Xor],
            difficulty: Difficulty::Easy,
            question: "Final output per case?".to_string(),
            data: CircuitData::MultipleCases {
                test_cases,
                expected_output,
            },
        };
        let report = simulate(&circuit);
        assert!(report.valid);
        assert_eq!(report.steps.len(), 4);
    }

    #[test]
    fn test_multi_case_mismatched_expectation_is_invalid() {
        let mut test_cases = BTreeMap::new();
        test_cases.insert(
            "case1".to_string(),
            vec![
                CircuitRow::new(vec![1, 1], 1),
                CircuitRow::new(vec![1, 0], 1),
            ],
        );
        let mut expected_output = BTreeMap::new();
        expected_output.insert("case1".to_string(), 0);

        let circuit = CircuitDescriptor {
            pattern: vec![GateType::And, GateType::Xor],
            difficulty: Difficulty::Easy,
            question: "Final output per case?".to_string(),
            data: CircuitData::MultipleCases {
                test_cases,
                expected_output,
            },
        };
        let report = simulate(&circuit);
        assert!(!report.valid);
    }

    #[test]
    fn test_pattern_analysis_recomputes_from_seed() {
        let circuit = CircuitDescriptor {
            pattern: vec![GateType::Xor, GateType::Or],
            difficulty: Difficulty::Hard,
            question: "Analyze the sequence".to_string(),
            data: CircuitData::PatternAnalysis {
                seed: vec![1, 0],
                expected_output: PatternComponents {
                    pattern: vec![1, 1, 0, 1, 1, 1, 0, 1],
                    cycle_length: 4,
                    final_state: 1,
                },
            },
        };
        let report = simulate(&circuit);
        assert!(report.valid, "{:?}", report.message);
        assert_eq!(report.final_output, 1);
    }

    #[test]
    fn test_pattern_analysis_rejects_wrong_cycle_length() {
        let circuit = CircuitDescriptor {
            pattern: vec![GateType::Xor, GateType::Or],
            difficulty: Difficulty::Hard,
            question: "Analyze the sequence".to_string(),
            data: CircuitData::PatternAnalysis {
                seed: vec![1, 0],
                expected_output: PatternComponents {
                    pattern: vec![1, 1, 0, 1, 1, 1, 0, 1],
                    cycle_length: 2,
                    final_state: 1,
                },
            },
        };
        let report = simulate(&circuit);
        assert!(!report.valid);
        assert!(report.message.unwrap().contains("cycle length"));
    }

    #[test]
    fn test_pattern_analysis_rejects_fabricated_sequence() {
        let circuit = CircuitDescriptor {
            pattern: vec![GateType::Xor, GateType::Or],
            difficulty: Difficulty::Hard,
            question: "Analyze the sequence".to_string(),
            data: CircuitData::PatternAnalysis {
                seed: vec![1, 0],
                expected_output: PatternComponents {
                    pattern: vec![0, 0, 0, 1, 1, 1, 0, 1],
                    cycle_length: 8,
                    final_state: 1,
                },
            },
        };
        let report = simulate(&circuit);
        assert!(!report.valid);
    }
}
