//! Fairness engine: the caller-facing entry point.
//!
//! One bet is: validate params, reserve a nonce on the player's active pair,
//! derive the outcome, and return everything needed to verify it later.
//! Settlement and balances stay with the caller.

use crate::config::FairnessConfig;
use crate::errors::FairResult;
use crate::games::{self, GameOutcome, GameParams};
use crate::seeds::{Rotation, SeedPairManager, SeedPairStore, SeedPairView};
use crate::verifier::{VerificationResult, VerifyRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Authoritative record of a bet: the committed inputs plus the derived outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BetRecord {
    pub player_id: String,
    pub server_seed_hash: String,
    pub client_seed: String,
    pub nonce: u64,
    pub params: GameParams,
    pub outcome: GameOutcome,
    pub placed_at: DateTime<Utc>,
}

impl BetRecord {
    /// Verification request for this bet once its server seed is revealed
    pub fn verification_request(&self, revealed_server_seed: &str) -> VerifyRequest {
        VerifyRequest {
            server_seed: revealed_server_seed.to_string(),
            server_seed_hash: self.server_seed_hash.clone(),
            client_seed: self.client_seed.clone(),
            nonce: self.nonce,
            params: self.params,
            expected: self.outcome.clone(),
        }
    }
}

pub struct FairnessEngine<S: SeedPairStore> {
    config: FairnessConfig,
    seeds: SeedPairManager<S>,
}

impl<S: SeedPairStore> FairnessEngine<S> {
    pub fn new(config: FairnessConfig, store: Arc<S>) -> FairResult<Self> {
        config.validate()?;
        let seeds = SeedPairManager::new(store, config.seeds.client_seed_bytes);
        Ok(Self { config, seeds })
    }

    pub fn config(&self) -> &FairnessConfig {
        &self.config
    }

    pub fn seeds(&self) -> &SeedPairManager<S> {
        &self.seeds
    }

    /// Public commitment for the player's active pair
    pub async fn commitment(&self, player_id: &str) -> FairResult<SeedPairView> {
        Ok(self.seeds.active_pair(player_id).await?.public_view())
    }

    /// Derive the outcome of the player's next bet
    pub async fn place_bet(&self, player_id: &str, params: GameParams) -> FairResult<BetRecord> {
        // Rejected params must not consume a nonce
        games::validate_params(&params)?;
        self.config.limits.check(&params)?;

        let (pair, nonce) = self.seeds.next_nonce(player_id).await?;
        let outcome = match games::generate_outcome(pair.seed_triple(nonce), &params) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(player_id, nonce, "Outcome derivation failed after nonce reservation: {}", e);
                return Err(e);
            }
        };

        tracing::debug!(
            player_id,
            nonce,
            game = %params.game_type(),
            server_seed_hash = pair.server_seed_hash(),
            "Bet outcome: {}",
            outcome
        );

        Ok(BetRecord {
            player_id: player_id.to_string(),
            server_seed_hash: pair.server_seed_hash().to_string(),
            client_seed: pair.client_seed().to_string(),
            nonce,
            params,
            outcome,
            placed_at: Utc::now(),
        })
    }

    /// Reveal the player's active pair and commit a new one
    pub async fn rotate(&self, player_id: &str, new_client_seed: Option<String>) -> FairResult<Rotation> {
        self.seeds.rotate(player_id, new_client_seed).await
    }

    /// Check a historical bet
    pub fn verify(&self, request: &VerifyRequest) -> FairResult<VerificationResult> {
        let result = request.verify()?;
        if !result.is_valid {
            tracing::info!(
                nonce = request.nonce,
                server_seed_match = result.server_seed_match,
                "Verification failed: {}",
                result.details
            );
        }
        Ok(result)
    }
}
