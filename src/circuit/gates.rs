//! Pure boolean gate evaluation.

use super::GateType;
use crate::error::CircuitError;

/// Evaluate a gate over binary inputs.
///
/// NOT takes exactly one input; every other gate folds over two or more.
/// Referentially transparent; the simulator and the fallback fixtures both
/// lean on it.
pub fn evaluate(gate: GateType, inputs: &[u8]) -> Result<u8, CircuitError> {
    for &v in inputs {
        if v > 1 {
            return Err(CircuitError::NonBinaryValue { value: v as i64 });
        }
    }

    if gate.is_unary() {
        if inputs.len() != 1 {
            return Err(CircuitError::InvalidInputCount {
                gate,
                got: inputs.len(),
            });
        }
        return Ok(1 - inputs[0]);
    }

    if inputs.len() < 2 {
        return Err(CircuitError::InvalidInputCount {
            gate,
            got: inputs.len(),
        });
    }

    let all = inputs.iter().all(|&v| v == 1);
    let any = inputs.iter().any(|&v| v == 1);
    let parity = inputs.iter().map(|&v| v as u32).sum::<u32>() % 2;

    let out = match gate {
        GateType::And => all as u8,
        GateType::Or => any as u8,
        GateType::Xor => parity as u8,
        GateType::Nand => (!all) as u8,
        GateType::Nor => (!any) as u8,
        GateType::Xnor => 1 - parity as u8,
        GateType::Not => unreachable!("handled above"),
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_truth_table() {
        assert_eq!(evaluate(GateType::And, &[0, 0]).unwrap(), 0);
        assert_eq!(evaluate(GateType::And, &[0, 1]).unwrap(), 0);
        assert_eq!(evaluate(GateType::And, &[1, 0]).unwrap(), 0);
        assert_eq!(evaluate(GateType::And, &[1, 1]).unwrap(), 1);
        assert_eq!(evaluate(GateType::And, &[1, 1, 1, 1]).unwrap(), 1);
        assert_eq!(evaluate(GateType::And, &[1, 1, 0, 1]).unwrap(), 0);
    }

    #[test]
    fn test_or_truth_table() {
        assert_eq!(evaluate(GateType::Or, &[0, 0]).unwrap(), 0);
        assert_eq!(evaluate(GateType::Or, &[0, 1]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Or, &[1, 0]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Or, &[1, 1]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Or, &[0, 0, 0]).unwrap(), 0);
    }

    #[test]
    fn test_not_truth_table() {
        assert_eq!(evaluate(GateType::Not, &[0]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Not, &[1]).unwrap(), 0);
    }

    #[test]
    fn test_xor_is_parity() {
        assert_eq!(evaluate(GateType::Xor, &[1, 0]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Xor, &[1, 1]).unwrap(), 0);
        assert_eq!(evaluate(GateType::Xor, &[1, 0, 1]).unwrap(), 0);
        assert_eq!(evaluate(GateType::Xor, &[1, 1, 1]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Xor, &[1, 1, 1, 0]).unwrap(), 1);
    }

    #[test]
    fn test_complement_gates() {
        assert_eq!(evaluate(GateType::Nand, &[1, 1]).unwrap(), 0);
        assert_eq!(evaluate(GateType::Nand, &[1, 0]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Nor, &[0, 0]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Nor, &[0, 1]).unwrap(), 0);
        assert_eq!(evaluate(GateType::Xnor, &[1, 1]).unwrap(), 1);
        assert_eq!(evaluate(GateType::Xnor, &[1, 0]).unwrap(), 0);
        assert_eq!(evaluate(GateType::Xnor, &[1, 0, 1]).unwrap(), 1);
    }

    #[test]
    fn test_not_rejects_wrong_arity() {
        let err = evaluate(GateType::Not, &[1, 0]).unwrap_err();
        assert!(matches!(
            err,
            CircuitError::InvalidInputCount {
                gate: GateType::Not,
                got: 2
            }
        ));
        assert!(evaluate(GateType::Not, &[]).is_err());
    }

    #[test]
    fn test_binary_gates_reject_single_input() {
        for gate in [
            GateType::And,
            GateType::Or,
            GateType::Xor,
            GateType::Nand,
            GateType::Nor,
            GateType::Xnor,
        ] {
            assert!(evaluate(gate, &[1]).is_err(), "{} accepted 1 input", gate);
        }
    }

    #[test]
    fn test_rejects_non_binary_values() {
        let err = evaluate(GateType::And, &[1, 2]).unwrap_err();
        assert!(matches!(err, CircuitError::NonBinaryValue { value: 2 }));
    }
}
