use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::circuit::{
    CircuitData, CircuitDescriptor, CircuitRow, ComplexityType, Difficulty, GateType,
    PatternComponents,
};
use crate::error::CircuitError;

/// Request for one candidate circuit.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitRequest {
    /// Requested difficulty.
    pub difficulty: Difficulty,
    /// Requested complexity tier.
    pub complexity_type: ComplexityType,
    /// Number of gates the pattern must contain.
    pub gate_count: usize,
    /// Number of inputs per gate application.
    pub input_count: usize,
}

impl CircuitRequest {
    /// Build a request with the gate and input counts the difficulty implies.
    pub fn new(difficulty: Difficulty, complexity_type: ComplexityType) -> Self {
        Self {
            difficulty,
            complexity_type,
            gate_count: difficulty.gate_count(),
            input_count: difficulty.input_count(),
        }
    }
}

/// Candidate circuit as the generator returned it.
///
/// Every field is optional: the strict conversion below, not the wire
/// parse, decides whether the candidate is usable. There is deliberately no
/// textual repair of malformed payloads — a candidate that does not parse
/// is a candidate that gets regenerated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCircuitCandidate {
    /// Gate names composing the pattern.
    #[serde(default)]
    pub pattern: Option<Vec<String>>,
    /// Tier tag, e.g. `"single_output"`.
    #[serde(default)]
    pub complexity_type: Option<String>,
    /// Question shown to the player.
    #[serde(default)]
    pub question: Option<String>,
    /// Flat rows for the single-output tier.
    #[serde(default)]
    pub input_values: Option<Vec<Vec<i64>>>,
    /// Flat rows per case for the multiple-cases tier.
    #[serde(default)]
    pub test_cases: Option<BTreeMap<String, Vec<Vec<i64>>>>,
    /// Seed window for the pattern-analysis tier.
    #[serde(default, alias = "sequence_inputs")]
    pub seed: Option<Vec<i64>>,
    /// Tier-shaped expected output (scalar, case map, or components).
    #[serde(default)]
    pub expected_output: Option<Value>,
}

impl RawCircuitCandidate {
    /// Strictly convert the candidate into a descriptor.
    ///
    /// Checks presence, binary values, row/pattern length congruence, gate
    /// arities, and case-key congruence. Semantic consistency (do the
    /// recorded outputs match the gate math?) is the simulator's job.
    pub fn into_descriptor(self, difficulty: Difficulty) -> Result<CircuitDescriptor, CircuitError> {
        let names = non_empty(self.pattern, "pattern")?;
        let pattern = names
            .iter()
            .map(|name| {
                name.parse::<GateType>()
                    .map_err(|message| CircuitError::Malformed { message })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tier = self
            .complexity_type
            .ok_or_else(|| missing("complexity_type"))?
            .parse::<ComplexityType>()
            .map_err(|message| CircuitError::Malformed { message })?;

        let question = self
            .question
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| default_question(tier));

        let data = match tier {
            ComplexityType::SingleOutput => {
                let rows = parse_rows(non_empty(self.input_values, "input_values")?)?;
                check_row_shape(&pattern, &rows)?;
                let expected_output =
                    bit_value(self.expected_output.as_ref().ok_or_else(|| {
                        missing("expected_output")
                    })?)?;
                CircuitData::SingleOutput {
                    input_values: rows,
                    expected_output,
                }
            }
            ComplexityType::MultipleCases => {
                let raw_cases = self.test_cases.ok_or_else(|| missing("test_cases"))?;
                if raw_cases.is_empty() {
                    return Err(missing("test_cases"));
                }
                let expected = self
                    .expected_output
                    .as_ref()
                    .and_then(Value::as_object)
                    .ok_or_else(|| CircuitError::Malformed {
                        message: "expected_output must map case ids to outputs".to_string(),
                    })?;

                let mut test_cases = BTreeMap::new();
                let mut expected_output = BTreeMap::new();
                for (case_id, raw_rows) in raw_cases {
                    let rows = parse_rows(raw_rows)?;
                    check_row_shape(&pattern, &rows)?;
                    let value = expected.get(&case_id).ok_or_else(|| CircuitError::Malformed {
                        message: format!("no expected output for {}", case_id),
                    })?;
                    expected_output.insert(case_id.clone(), bit_value(value)?);
                    test_cases.insert(case_id, rows);
                }
                for case_id in expected.keys() {
                    if !test_cases.contains_key(case_id) {
                        return Err(CircuitError::Malformed {
                            message: format!("expected output for unknown case {}", case_id),
                        });
                    }
                }
                CircuitData::MultipleCases {
                    test_cases,
                    expected_output,
                }
            }
            ComplexityType::PatternAnalysis => {
                let seed = bits(non_empty(self.seed, "seed")?)?;
                if seed.len() < 2 {
                    return Err(CircuitError::Malformed {
                        message: format!("seed needs at least 2 values, got {}", seed.len()),
                    });
                }
                let components = self
                    .expected_output
                    .as_ref()
                    .and_then(Value::as_object)
                    .ok_or_else(|| CircuitError::Malformed {
                        message: "expected_output must carry pattern components".to_string(),
                    })?;
                let sequence = components
                    .get("pattern")
                    .and_then(Value::as_array)
                    .ok_or_else(|| missing("expected_output.pattern"))?
                    .iter()
                    .map(bit_value)
                    .collect::<Result<Vec<_>, _>>()?;
                if sequence.is_empty() {
                    return Err(missing("expected_output.pattern"));
                }
                let cycle_length = components
                    .get("cycle_length")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| missing("expected_output.cycle_length"))?
                    as usize;
                let final_state = bit_value(
                    components
                        .get("final_state")
                        .ok_or_else(|| missing("expected_output.final_state"))?,
                )?;
                CircuitData::PatternAnalysis {
                    seed,
                    expected_output: PatternComponents {
                        pattern: sequence,
                        cycle_length,
                        final_state,
                    },
                }
            }
        };

        Ok(CircuitDescriptor {
            pattern,
            difficulty,
            question,
            data,
        })
    }
}

fn missing(field: &str) -> CircuitError {
    CircuitError::Malformed {
        message: format!("missing {}", field),
    }
}

fn non_empty<T>(field: Option<Vec<T>>, name: &str) -> Result<Vec<T>, CircuitError> {
    match field {
        Some(values) if !values.is_empty() => Ok(values),
        _ => Err(missing(name)),
    }
}

fn parse_rows(raw: Vec<Vec<i64>>) -> Result<Vec<CircuitRow>, CircuitError> {
    raw.into_iter().map(CircuitRow::try_from).collect()
}

fn check_row_shape(pattern: &[GateType], rows: &[CircuitRow]) -> Result<(), CircuitError> {
    if rows.len() != pattern.len() {
        return Err(CircuitError::Malformed {
            message: format!("{} rows for {} gates", rows.len(), pattern.len()),
        });
    }
    for (gate, row) in pattern.iter().zip(rows) {
        let arity_ok = if gate.is_unary() {
            row.inputs.len() == 1
        } else {
            row.inputs.len() >= 2
        };
        if !arity_ok {
            return Err(CircuitError::InvalidInputCount {
                gate: *gate,
                got: row.inputs.len(),
            });
        }
    }
    Ok(())
}

fn bits(raw: Vec<i64>) -> Result<Vec<u8>, CircuitError> {
    raw.into_iter()
        .map(|v| match v {
            0 => Ok(0),
            1 => Ok(1),
            other => Err(CircuitError::NonBinaryValue { value: other }),
        })
        .collect()
}

fn bit_value(value: &Value) -> Result<u8, CircuitError> {
    match value.as_i64() {
        Some(0) => Ok(0),
        Some(1) => Ok(1),
        Some(other) => Err(CircuitError::NonBinaryValue { value: other }),
        None => Err(CircuitError::Malformed {
            message: format!("expected 0 or 1, got {}", value),
        }),
    }
}

fn default_question(tier: ComplexityType) -> String {
    match tier {
        ComplexityType::SingleOutput => {
            "Evaluate each gate in order. What is the final output?".to_string()
        }
        ComplexityType::MultipleCases => {
            "Evaluate the circuit for every test case. What is each final output?".to_string()
        }
        ComplexityType::PatternAnalysis => {
            "The gates are applied cyclically over a sliding window. \
             Give the output sequence, its cycle length, and its final state."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn single_candidate() -> RawCircuitCandidate {
        serde_json::from_value(json!({
            "pattern": ["XOR", "NAND"],
            "complexity_type": "single_output",
            "question": "What is the final output?",
            "input_values": [[1, 0, 1], [1, 1, 0]],
            "expected_output": 0
        }))
        .unwrap()
    }

    #[test]
    fn test_single_output_conversion() {
        let descriptor = single_candidate()
            .into_descriptor(Difficulty::Easy)
            .unwrap();
        assert_eq!(descriptor.pattern, vec![GateType::Xor, GateType::Nand]);
        assert_eq!(descriptor.complexity_type(), ComplexityType::SingleOutput);
        match descriptor.data {
            CircuitData::SingleOutput {
                input_values,
                expected_output,
            } => {
                assert_eq!(input_values.len(), 2);
                assert_eq!(expected_output, 0);
            }
            other => panic!("wrong tier: {:?}", other),
        }
    }

    #[test]
    fn test_missing_pattern_is_rejected() {
        let mut candidate = single_candidate();
        candidate.pattern = None;
        let err = candidate.into_descriptor(Difficulty::Easy).unwrap_err();
        assert!(err.to_string().contains("missing pattern"));
    }

    #[test]
    fn test_unknown_gate_is_rejected() {
        let mut candidate = single_candidate();
        candidate.pattern = Some(vec!["XOR".to_string(), "MAYBE".to_string()]);
        assert!(candidate.into_descriptor(Difficulty::Easy).is_err());
    }

    #[test]
    fn test_row_count_mismatch_is_rejected() {
        let mut candidate = single_candidate();
        candidate.input_values = Some(vec![vec![1, 0, 1]]);
        assert!(candidate.into_descriptor(Difficulty::Easy).is_err());
    }

    #[test]
    fn test_non_binary_row_is_rejected() {
        let mut candidate = single_candidate();
        candidate.input_values = Some(vec![vec![1, 0, 1], vec![1, 2, 0]]);
        assert!(candidate.into_descriptor(Difficulty::Easy).is_err());
    }

    #[test]
    fn test_wrong_arity_for_not_is_rejected() {
        let candidate: RawCircuitCandidate = serde_json::from_value(json!({
            "pattern": ["NOT", "XOR"],
            "complexity_type": "single_output",
            "input_values": [[1, 0, 0], [1, 1, 0]],
            "expected_output": 0
        }))
        .unwrap();
        let err = candidate.into_descriptor(Difficulty::Easy).unwrap_err();
        assert!(matches!(err, CircuitError::InvalidInputCount { .. }));
    }

    #[test]
    fn test_multi_case_key_congruence() {
        let candidate: RawCircuitCandidate = serde_json::from_value(json!({
            "pattern": ["AND", "XOR"],
            "complexity_type": "multiple_cases",
            "test_cases": {
                "case1": [[1, 1, 1], [1, 0, 1]],
                "case2": [[0, 1, 0], [1, 1, 0]]
            },
            "expected_output": {"case1": 1}
        }))
        .unwrap();
        let err = candidate.into_descriptor(Difficulty::Easy).unwrap_err();
        assert!(err.to_string().contains("case2"));
    }

    #[test]
    fn test_pattern_analysis_conversion() {
        let candidate: RawCircuitCandidate = serde_json::from_value(json!({
            "pattern": ["XOR", "OR"],
            "complexity_type": "pattern_analysis",
            "sequence_inputs": [1, 0],
            "expected_output": {
                "pattern": [1, 1, 0, 1, 1, 1, 0, 1],
                "cycle_length": 4,
                "final_state": 1
            }
        }))
        .unwrap();
        let descriptor = candidate.into_descriptor(Difficulty::Hard).unwrap();
        match descriptor.data {
            CircuitData::PatternAnalysis {
                seed,
                expected_output,
            } => {
                assert_eq!(seed, vec![1, 0]);
                assert_eq!(expected_output.cycle_length, 4);
                assert_eq!(expected_output.final_state, 1);
            }
            other => panic!("wrong tier: {:?}", other),
        }
    }

    #[test]
    fn test_question_defaults_when_absent() {
        let mut candidate = single_candidate();
        candidate.question = Some("   ".to_string());
        let descriptor = candidate.into_descriptor(Difficulty::Easy).unwrap();
        assert!(!descriptor.question.trim().is_empty());
    }

    #[test]
    fn test_request_counts_follow_difficulty() {
        let request = CircuitRequest::new(Difficulty::Hard, ComplexityType::PatternAnalysis);
        assert_eq!(request.gate_count, 4);
        assert_eq!(request.input_count, 4);
    }
}
