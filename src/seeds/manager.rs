use super::pair::{validate_client_seed, Rotation, SeedPair};
use super::store::SeedPairStore;
use crate::errors::{FairResult, FairnessError};
use std::sync::Arc;

/// Per-player seed pair lifecycle on top of a [`SeedPairStore`]
pub struct SeedPairManager<S: SeedPairStore> {
    store: Arc<S>,
    client_seed_bytes: usize,
}

impl<S: SeedPairStore> Clone for SeedPairManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            client_seed_bytes: self.client_seed_bytes,
        }
    }
}

impl<S: SeedPairStore> SeedPairManager<S> {
    pub fn new(store: Arc<S>, client_seed_bytes: usize) -> Self {
        Self {
            store,
            client_seed_bytes,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Commit a new pair for a player who has none.
    ///
    /// If a pair is already active it is returned unchanged; use
    /// [`SeedPairManager::rotate`] to replace it.
    pub async fn create_pair(&self, player_id: &str, client_seed: Option<String>) -> FairResult<SeedPair> {
        let pair = SeedPair::generate(client_seed, self.client_seed_bytes)?;
        let active = self.store.insert_active(player_id, pair).await?;
        tracing::info!(
            player_id,
            server_seed_hash = active.server_seed_hash(),
            "Seed pair committed"
        );
        Ok(active)
    }

    /// Active pair for a player, committing one on first use
    pub async fn active_pair(&self, player_id: &str) -> FairResult<SeedPair> {
        match self.store.load(player_id).await? {
            Some(pair) => Ok(pair),
            None => self.create_pair(player_id, None).await,
        }
    }

    /// Reserve the next nonce for a bet.
    ///
    /// Returns the pair as it stood when the nonce was taken, plus the nonce.
    /// A concurrent bet that won the race surfaces as `NonceReuse`; retrying is
    /// the caller's decision.
    pub async fn next_nonce(&self, player_id: &str) -> FairResult<(SeedPair, u64)> {
        let pair = self.active_pair(player_id).await?;
        let nonce = pair.nonce();
        let next = nonce
            .checked_add(1)
            .ok_or_else(|| FairnessError::invalid_parameter("nonce", nonce, "nonce space exhausted"))?;

        if let Err(e) = self
            .store
            .compare_and_swap_nonce(player_id, pair.server_seed_hash(), nonce, next)
            .await
        {
            tracing::warn!(player_id, nonce, "Nonce reservation rejected: {}", e);
            return Err(e);
        }

        tracing::debug!(player_id, nonce, "Nonce reserved");
        Ok((pair, nonce))
    }

    /// Reveal the active pair and commit a new one.
    ///
    /// A bet placed while the rotation is in flight surfaces as `NonceReuse`
    /// and the active pair is left untouched.
    pub async fn rotate(&self, player_id: &str, new_client_seed: Option<String>) -> FairResult<Rotation> {
        let current = self.active_pair(player_id).await?;
        let rotation = current.rotate(new_client_seed, self.client_seed_bytes)?;

        self.store
            .replace_active(player_id, rotation.revealed.clone(), rotation.new.clone())
            .await?;

        tracing::info!(
            player_id,
            revealed_hash = rotation.revealed.server_seed_hash(),
            bets = rotation.revealed.nonce(),
            new_hash = rotation.new.server_seed_hash(),
            "Seed pair rotated"
        );
        Ok(rotation)
    }

    /// Change the client seed. The active pair is rotated, since a client
    /// seed may not change mid-sequence.
    pub async fn set_client_seed(&self, player_id: &str, client_seed: String) -> FairResult<Rotation> {
        validate_client_seed(&client_seed)?;
        self.rotate(player_id, Some(client_seed)).await
    }

    /// Revealed pairs for a player, oldest first
    pub async fn history(&self, player_id: &str) -> FairResult<Vec<SeedPair>> {
        self.store.history(player_id).await
    }
}
