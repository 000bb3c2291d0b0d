//! Seed pair lifecycle: commit, per-bet nonce advancement, reveal and rotation.

pub mod pair;
pub mod store;
pub mod manager;

pub use pair::{Rotation, SeedPair, SeedPairView, ServerSeed, SERVER_SEED_LEN};
pub use store::{InMemorySeedPairStore, SeedPairStore};
pub use manager::SeedPairManager;
