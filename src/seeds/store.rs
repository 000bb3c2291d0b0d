//! Seed pair persistence interface.
//!
//! The store is the only shared mutable state in the engine. Nonce advancement
//! goes through `compare_and_swap_nonce`, so two concurrent bets on one pair can
//! never both be issued the same nonce.

use super::pair::SeedPair;
use crate::errors::{FairResult, FairnessError};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[async_trait]
pub trait SeedPairStore: Send + Sync {
    /// Active pair for a player, if any
    async fn load(&self, player_id: &str) -> FairResult<Option<SeedPair>>;

    /// Install `pair` as active unless one already exists; returns whichever
    /// pair is active afterwards
    async fn insert_active(&self, player_id: &str, pair: SeedPair) -> FairResult<SeedPair>;

    /// Move the active pair's nonce from `expected` to `new` atomically
    async fn compare_and_swap_nonce(
        &self,
        player_id: &str,
        server_seed_hash: &str,
        expected: u64,
        new: u64,
    ) -> FairResult<()>;

    /// Archive `revealed` and make `new` the active pair, provided `revealed`
    /// is still the active pair and no nonce was reserved since it was read
    async fn replace_active(&self, player_id: &str, revealed: SeedPair, new: SeedPair) -> FairResult<()>;

    /// Revealed pairs, oldest first
    async fn history(&self, player_id: &str) -> FairResult<Vec<SeedPair>>;
}

/// In-process store keyed by player id
#[derive(Default)]
pub struct InMemorySeedPairStore {
    active: DashMap<String, SeedPair>,
    revealed: DashMap<String, Vec<SeedPair>>,
}

impl InMemorySeedPairStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[async_trait]
impl SeedPairStore for InMemorySeedPairStore {
    async fn load(&self, player_id: &str) -> FairResult<Option<SeedPair>> {
        Ok(self.active.get(player_id).map(|entry| entry.value().clone()))
    }

    async fn insert_active(&self, player_id: &str, pair: SeedPair) -> FairResult<SeedPair> {
        if !pair.is_active() {
            return Err(FairnessError::PairInactive {
                server_seed_hash: pair.server_seed_hash().to_string(),
            });
        }
        match self.active.entry(player_id.to_string()) {
            Entry::Occupied(existing) => Ok(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(pair.clone());
                Ok(pair)
            }
        }
    }

    async fn compare_and_swap_nonce(
        &self,
        player_id: &str,
        server_seed_hash: &str,
        expected: u64,
        new: u64,
    ) -> FairResult<()> {
        if expected.checked_add(1) != Some(new) {
            return Err(FairnessError::invalid_parameter(
                "nonce",
                new,
                format!("a nonce can only advance by one from {}", expected),
            ));
        }

        let mut entry = self
            .active
            .get_mut(player_id)
            .ok_or_else(|| FairnessError::NotFound(player_id.to_string()))?;

        if entry.server_seed_hash() != server_seed_hash {
            return Err(FairnessError::PairInactive {
                server_seed_hash: server_seed_hash.to_string(),
            });
        }
        entry.consume_nonce(expected)
    }

    async fn replace_active(&self, player_id: &str, revealed: SeedPair, new: SeedPair) -> FairResult<()> {
        if revealed.is_active() || !new.is_active() {
            return Err(FairnessError::Storage(
                "rotation must archive a revealed pair and install an active one".to_string(),
            ));
        }

        {
            let mut entry = self
                .active
                .get_mut(player_id)
                .ok_or_else(|| FairnessError::NotFound(player_id.to_string()))?;
            if entry.server_seed_hash() != revealed.server_seed_hash() {
                return Err(FairnessError::PairInactive {
                    server_seed_hash: revealed.server_seed_hash().to_string(),
                });
            }
            // The archived pair must carry the live nonce count
            if entry.nonce() != revealed.nonce() {
                return Err(FairnessError::NonceReuse {
                    expected: entry.nonce(),
                    actual: revealed.nonce(),
                });
            }
            *entry = new;
        }

        self.revealed
            .entry(player_id.to_string())
            .or_default()
            .push(revealed);
        Ok(())
    }

    async fn history(&self, player_id: &str) -> FairResult<Vec<SeedPair>> {
        Ok(self
            .revealed
            .get(player_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
