//! Every emergency circuit must be playable: internally consistent and
//! diverse enough to pass the same checks generator output faces.

use circuit_game_server::circuit::{
    pool_for, simulate, supply, validate, ComplexityType, Difficulty,
};

const TIERS: [ComplexityType; 3] = [
    ComplexityType::SingleOutput,
    ComplexityType::MultipleCases,
    ComplexityType::PatternAnalysis,
];

const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

#[test]
fn test_every_pool_circuit_is_self_consistent() {
    for tier in TIERS {
        for difficulty in DIFFICULTIES {
            for circuit in pool_for(tier, difficulty) {
                let report = simulate(&circuit);
                assert!(
                    report.valid,
                    "{} {} fixture failed replay: {:?}",
                    tier,
                    difficulty,
                    report.message
                );
            }
        }
    }
}

#[test]
fn test_every_pool_circuit_passes_diversity_checks() {
    for tier in TIERS {
        for difficulty in DIFFICULTIES {
            for circuit in pool_for(tier, difficulty) {
                assert!(
                    validate(&circuit).is_ok(),
                    "{} {} fixture rejected: {:?}",
                    tier,
                    difficulty,
                    validate(&circuit)
                );
            }
        }
    }
}

#[test]
fn test_pool_circuits_match_their_difficulty_shape() {
    for tier in TIERS {
        for difficulty in DIFFICULTIES {
            for circuit in pool_for(tier, difficulty) {
                assert_eq!(circuit.difficulty, difficulty);
                assert_eq!(circuit.complexity_type(), tier);
                assert_eq!(circuit.pattern.len(), difficulty.gate_count());
            }
        }
    }
}

#[test]
fn test_supply_serves_from_the_pool() {
    for tier in TIERS {
        for difficulty in DIFFICULTIES {
            let pool = pool_for(tier, difficulty);
            for _ in 0..20 {
                let served = supply(tier, difficulty);
                assert!(
                    pool.contains(&served),
                    "supply served a circuit outside the pool"
                );
            }
        }
    }
}
