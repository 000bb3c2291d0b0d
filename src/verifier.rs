//! Bet verification: confirm a revealed server seed against its commitment and
//! recompute the outcome the player was shown.
//!
//! A mismatch is a normal result, not an error. Errors are reserved for
//! malformed requests (bad hex, wrong lengths, params and outcome for different
//! games, invalid params).

use crate::errors::{FairResult, FairnessError};
use crate::games::{self, GameOutcome, GameParams, SeedTriple};
use crate::hash;
use crate::seeds::ServerSeed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Claims about one historical bet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyRequest {
    /// Revealed server seed, hex
    pub server_seed: String,
    /// Commitment published before the bet, hex
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub params: GameParams,
    /// Outcome the player was shown
    pub expected: GameOutcome,
}

impl VerifyRequest {
    pub fn verify(&self) -> FairResult<VerificationResult> {
        verify_bet(
            &self.server_seed,
            &self.server_seed_hash,
            &self.client_seed,
            self.nonce,
            &self.params,
            &self.expected,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationResult {
    pub is_valid: bool,
    pub server_seed_match: bool,
    pub outcome_match: bool,
    /// Recomputed outcome; absent when the seed did not match its hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed: Option<GameOutcome>,
    pub details: String,
}

/// Recompute and check a historical bet
pub fn verify_bet(
    server_seed: &str,
    server_seed_hash: &str,
    client_seed: &str,
    nonce: u64,
    params: &GameParams,
    expected: &GameOutcome,
) -> FairResult<VerificationResult> {
    let seed = ServerSeed::from_hex(server_seed)?;
    let committed: [u8; 32] = hash::decode_fixed_hex("server_seed_hash", server_seed_hash)?;
    if params.game_type() != expected.game_type() {
        return Err(FairnessError::MalformedInput(format!(
            "params are for {} but the claimed outcome is for {}",
            params.game_type(),
            expected.game_type()
        )));
    }

    let actual_hash = seed.hash_hex();
    if actual_hash != hex::encode(committed) {
        return Ok(VerificationResult {
            is_valid: false,
            server_seed_match: false,
            outcome_match: false,
            computed: None,
            details: format!(
                "server seed hash mismatch: sha256(server_seed) = {}, committed = {}; outcome not checked",
                actual_hash,
                server_seed_hash.to_lowercase()
            ),
        });
    }

    let computed = games::generate_outcome(SeedTriple::new(seed.as_bytes(), client_seed, nonce), params)?;
    let outcome_match = outcomes_match(&computed, expected);
    let details = format!(
        "server seed matches commitment {}; {} nonce {}: computed {}, claimed {}{}",
        actual_hash,
        params.game_type(),
        nonce,
        computed,
        expected,
        if outcome_match { "" } else { " (MISMATCH)" }
    );

    Ok(VerificationResult {
        is_valid: outcome_match,
        server_seed_match: true,
        outcome_match,
        computed: Some(computed),
        details,
    })
}

/// Tolerance for floating outcomes (rolls and multipliers)
pub const FLOAT_TOLERANCE: f64 = 0.01;

/// Values match when they differ by less than [`FLOAT_TOLERANCE`]. The bound is
/// exclusive, and the slack absorbs binary representation error, so adjacent
/// two-decimal values such as 81.99 and 82.00 never match.
pub fn floats_match(a: f64, b: f64) -> bool {
    (a - b).abs() < FLOAT_TOLERANCE - 1e-9
}

/// Game-appropriate equality between a recomputed and a claimed outcome
pub fn outcomes_match(computed: &GameOutcome, claimed: &GameOutcome) -> bool {
    match (computed, claimed) {
        (GameOutcome::Dice(a), GameOutcome::Dice(b)) => floats_match(a.roll, b.roll),
        (GameOutcome::Crash(a), GameOutcome::Crash(b)) => floats_match(a.crash_point, b.crash_point),
        (GameOutcome::Limbo(a), GameOutcome::Limbo(b)) => floats_match(a.result, b.result),
        (GameOutcome::Mines(a), GameOutcome::Mines(b)) => {
            a.positions.len() == b.positions.len()
                && a.positions.iter().collect::<BTreeSet<_>>() == b.positions.iter().collect::<BTreeSet<_>>()
        }
        (GameOutcome::Plinko(a), GameOutcome::Plinko(b)) => a.final_slot == b.final_slot,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{DiceOutcome, DiceParams, MinesOutcome, MinesParams, Settlement};

    const ZERO_HASH: &str = "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925";

    fn zero_seed() -> String {
        "00".repeat(32)
    }

    fn dice_claim(roll: f64) -> GameOutcome {
        GameOutcome::Dice(DiceOutcome {
            roll,
            win_chance: 50.0,
            settlement: Settlement::win(1.98),
        })
    }

    fn dice_params() -> GameParams {
        GameParams::Dice(DiceParams {
            target: 50.0,
            is_over: true,
        })
    }

    #[test]
    fn test_golden_bet_verifies() {
        let result = verify_bet(&zero_seed(), ZERO_HASH, "test", 0, &dice_params(), &dice_claim(81.99)).unwrap();
        assert!(result.is_valid);
        assert!(result.server_seed_match);
        assert!(result.outcome_match);
        assert!(result.details.contains("81.99"));
    }

    #[test]
    fn test_wrong_claim_is_reported_not_raised() {
        let result = verify_bet(&zero_seed(), ZERO_HASH, "test", 0, &dice_params(), &dice_claim(12.34)).unwrap();
        assert!(!result.is_valid);
        assert!(result.server_seed_match);
        assert!(!result.outcome_match);
        assert!(result.details.contains("MISMATCH"));
    }

    #[test]
    fn test_hash_mismatch_skips_outcome() {
        let other_hash = hash::sha256_hex(b"something else");
        let result = verify_bet(&zero_seed(), &other_hash, "test", 0, &dice_params(), &dice_claim(81.99)).unwrap();
        assert!(!result.server_seed_match);
        assert!(!result.outcome_match);
        assert!(result.computed.is_none());
    }

    #[test]
    fn test_malformed_input_errors() {
        assert!(verify_bet("xyz", ZERO_HASH, "test", 0, &dice_params(), &dice_claim(81.99)).is_err());
        assert!(verify_bet(&zero_seed(), "abcd", "test", 0, &dice_params(), &dice_claim(81.99)).is_err());

        let mines_claim = GameOutcome::Mines(MinesOutcome {
            positions: vec![1, 2, 3],
            fingerprint: String::new(),
            draws: 3,
        });
        assert!(verify_bet(&zero_seed(), ZERO_HASH, "test", 0, &dice_params(), &mines_claim).is_err());
    }

    #[test]
    fn test_mines_order_independent() {
        let claim = GameOutcome::Mines(MinesOutcome {
            positions: vec![20, 10, 17],
            fingerprint: String::new(),
            draws: 0,
        });
        let params = GameParams::Mines(MinesParams::new(3));
        let result = verify_bet(&zero_seed(), ZERO_HASH, "test", 0, &params, &claim).unwrap();
        assert!(result.is_valid);
    }

    #[test]
    fn test_float_tolerance() {
        assert!(floats_match(81.99, 81.99));
        assert!(floats_match(81.99, 81.991));
        assert!(floats_match(81.99, 81.996));
        assert!(floats_match(5.5, 5.5099));
        assert!(!floats_match(81.99, 82.0));
        assert!(!floats_match(0.01, 0.02));
        assert!(!floats_match(50.0, 50.01));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let request = VerifyRequest {
            server_seed: zero_seed(),
            server_seed_hash: ZERO_HASH.to_uppercase(),
            client_seed: "test".to_string(),
            nonce: 0,
            params: dice_params(),
            expected: dice_claim(81.99),
        };
        assert!(request.verify().unwrap().is_valid);
    }
}
