//! Fairseed - Provably Fair Outcome Engine
//!
//! Commit-reveal seed pairs and deterministic HMAC-SHA256 outcome derivation
//! for dice, crash, mines, limbo and plinko, plus a verifier that recomputes
//! any historical bet from its revealed server seed.
//!
//! Layers, bottom-up:
//! - [`hash`]: SHA-256, HMAC-SHA256 and hash-to-float conversion
//! - [`seeds`]: seed pair lifecycle and the nonce store
//! - [`games`]: one pure generator per game
//! - [`verifier`]: recompute and compare a past bet
//!
//! [`engine::FairnessEngine`] wires them together for a betting service.

pub mod config;
pub mod engine;
pub mod errors;
pub mod games;
pub mod hash;
pub mod seeds;
pub mod verifier;

pub use config::{ConfigLoader, FairnessConfig};
pub use engine::{BetRecord, FairnessEngine};
pub use errors::{FairResult, FairnessError};
pub use games::{
    generate_crash_point, generate_dice_result, generate_limbo_result, generate_mine_positions,
    generate_outcome, generate_plinko_path, GameOutcome, GameParams, GameType, SeedTriple, HOUSE_EDGE,
};
pub use hash::sha256_hex;
pub use seeds::{InMemorySeedPairStore, Rotation, SeedPair, SeedPairManager, SeedPairStore, ServerSeed};
pub use verifier::{verify_bet, VerificationResult, VerifyRequest};
