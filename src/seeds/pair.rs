use crate::errors::{FairResult, FairnessError};
use crate::games::SeedTriple;
use crate::hash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const SERVER_SEED_LEN: usize = 32;

/// Longest client seed accepted from a player
pub const MAX_CLIENT_SEED_LEN: usize = 64;

/// The house's secret. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSeed([u8; SERVER_SEED_LEN]);

impl ServerSeed {
    pub fn generate() -> Self {
        let mut bytes = [0u8; SERVER_SEED_LEN];
        bytes.copy_from_slice(&hash::generate_seed_bytes(SERVER_SEED_LEN));
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SERVER_SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(input: &str) -> FairResult<Self> {
        Ok(Self(hash::decode_fixed_hex("server_seed", input)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Commitment published before the first bet
    pub fn hash_hex(&self) -> String {
        hash::sha256_hex(&self.0)
    }
}

impl fmt::Debug for ServerSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServerSeed(<redacted>)")
    }
}

impl Serialize for ServerSeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ServerSeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_seed = String::deserialize(deserializer)?;
        ServerSeed::from_hex(&hex_seed).map_err(serde::de::Error::custom)
    }
}

pub fn validate_client_seed(client_seed: &str) -> FairResult<()> {
    if client_seed.is_empty() || client_seed.len() > MAX_CLIENT_SEED_LEN {
        return Err(FairnessError::invalid_parameter(
            "client_seed",
            client_seed,
            format!("length must be in 1..={}", MAX_CLIENT_SEED_LEN),
        ));
    }
    if client_seed.contains(':') || client_seed.chars().any(char::is_control) {
        return Err(FairnessError::invalid_parameter(
            "client_seed",
            client_seed,
            "must not contain ':' or control characters",
        ));
    }
    Ok(())
}

pub fn generate_client_seed(bytes: usize) -> String {
    hex::encode(hash::generate_seed_bytes(bytes))
}

/// One commitment: a secret server seed, its published hash, the player's
/// client seed, and the next unused nonce.
///
/// A pair is active until `revealed_at` is set; reveal and deactivation are
/// the same transition.
///
/// Serializing a `SeedPair` includes the server seed. Use [`SeedPair::public_view`]
/// for anything that leaves the house process. Deserializing recomputes the
/// commitment and rejects a record whose stored hash does not match its seed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "StoredSeedPair")]
pub struct SeedPair {
    server_seed: ServerSeed,
    server_seed_hash: String,
    client_seed: String,
    nonce: u64,
    created_at: DateTime<Utc>,
    revealed_at: Option<DateTime<Utc>>,
}

/// Wire form of a [`SeedPair`], checked before it becomes one
#[derive(Deserialize)]
struct StoredSeedPair {
    server_seed: ServerSeed,
    server_seed_hash: String,
    client_seed: String,
    nonce: u64,
    created_at: DateTime<Utc>,
    revealed_at: Option<DateTime<Utc>>,
}

impl TryFrom<StoredSeedPair> for SeedPair {
    type Error = FairnessError;

    fn try_from(stored: StoredSeedPair) -> FairResult<Self> {
        let mut pair = SeedPair::from_parts(stored.server_seed, stored.client_seed, stored.nonce, stored.created_at)?;
        if !pair.server_seed_hash.eq_ignore_ascii_case(&stored.server_seed_hash) {
            return Err(FairnessError::MalformedInput(format!(
                "stored server_seed_hash {} does not match the seed's hash {}",
                stored.server_seed_hash, pair.server_seed_hash
            )));
        }
        pair.revealed_at = stored.revealed_at;
        Ok(pair)
    }
}

impl SeedPair {
    /// Commit to a fresh server seed. A random client seed of
    /// `client_seed_bytes` bytes is generated when none is supplied.
    pub fn generate(client_seed: Option<String>, client_seed_bytes: usize) -> FairResult<Self> {
        let client_seed = match client_seed {
            Some(seed) => seed,
            None => generate_client_seed(client_seed_bytes),
        };
        Self::from_parts(ServerSeed::generate(), client_seed, 0, Utc::now())
    }

    /// Rebuild an active pair from known parts
    pub fn from_parts(
        server_seed: ServerSeed,
        client_seed: String,
        nonce: u64,
        created_at: DateTime<Utc>,
    ) -> FairResult<Self> {
        validate_client_seed(&client_seed)?;
        Ok(Self {
            server_seed_hash: server_seed.hash_hex(),
            server_seed,
            client_seed,
            nonce,
            created_at,
            revealed_at: None,
        })
    }

    pub fn server_seed_hash(&self) -> &str {
        &self.server_seed_hash
    }

    pub fn client_seed(&self) -> &str {
        &self.client_seed
    }

    /// Next unused nonce (zero-based)
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn revealed_at(&self) -> Option<DateTime<Utc>> {
        self.revealed_at
    }

    pub fn is_active(&self) -> bool {
        self.revealed_at.is_none()
    }

    /// The server seed in hex, available only after reveal
    pub fn revealed_server_seed(&self) -> Option<String> {
        self.revealed_at.map(|_| self.server_seed.to_hex())
    }

    /// `sha256(server_seed) == server_seed_hash`
    pub fn verify_commitment(&self) -> bool {
        self.server_seed.hash_hex() == self.server_seed_hash
    }

    /// Inputs for a generator call at `nonce`. Stays inside the process.
    pub fn seed_triple(&self, nonce: u64) -> SeedTriple<'_> {
        SeedTriple::new(self.server_seed.as_bytes(), &self.client_seed, nonce)
    }

    fn ensure_active(&self) -> FairResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(FairnessError::PairInactive {
                server_seed_hash: self.server_seed_hash.clone(),
            })
        }
    }

    /// Hand out the current nonce and advance past it
    pub fn next_nonce(&mut self) -> FairResult<u64> {
        self.ensure_active()?;
        let used = self.nonce;
        self.nonce = used.checked_add(1).ok_or_else(|| {
            FairnessError::invalid_parameter("nonce", used, "nonce space exhausted, rotate the pair")
        })?;
        Ok(used)
    }

    /// Consume a specific nonce. Anything but the current one is rejected:
    /// lower values were already used, higher values would skip.
    pub fn consume_nonce(&mut self, nonce: u64) -> FairResult<()> {
        self.ensure_active()?;
        if nonce != self.nonce {
            return Err(FairnessError::NonceReuse {
                expected: self.nonce,
                actual: nonce,
            });
        }
        self.next_nonce().map(|_| ())
    }

    /// Disclose the server seed and deactivate the pair
    pub fn reveal(&mut self) -> FairResult<()> {
        self.ensure_active()?;
        self.revealed_at = Some(Utc::now());
        Ok(())
    }

    /// Reveal this pair and commit to a new one
    pub fn rotate(mut self, new_client_seed: Option<String>, client_seed_bytes: usize) -> FairResult<Rotation> {
        if let Some(ref seed) = new_client_seed {
            validate_client_seed(seed)?;
        }
        self.reveal()?;
        let new = SeedPair::generate(new_client_seed, client_seed_bytes)?;
        Ok(Rotation {
            revealed: self,
            new,
        })
    }

    pub fn public_view(&self) -> SeedPairView {
        SeedPairView {
            server_seed_hash: self.server_seed_hash.clone(),
            server_seed: self.revealed_server_seed(),
            client_seed: self.client_seed.clone(),
            nonce: self.nonce,
            created_at: self.created_at,
            revealed_at: self.revealed_at,
            is_active: self.is_active(),
        }
    }
}

/// Result of a rotation: the revealed old pair and its active successor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rotation {
    pub revealed: SeedPair,
    pub new: SeedPair,
}

/// What a player may see of a pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedPairView {
    pub server_seed_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_seed: Option<String>,
    pub client_seed: String,
    pub nonce: u64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_pair() -> SeedPair {
        SeedPair::from_parts(ServerSeed::from_bytes([0u8; 32]), "test".to_string(), 0, Utc::now()).unwrap()
    }

    #[test]
    fn test_generate_commits_to_seed() {
        let pair = SeedPair::generate(None, 16).unwrap();
        assert!(pair.verify_commitment());
        assert!(pair.is_active());
        assert_eq!(pair.nonce(), 0);
        assert_eq!(pair.client_seed().len(), 32);
        assert!(pair.revealed_server_seed().is_none());
    }

    #[test]
    fn test_debug_and_view_hide_secret() {
        let pair = zero_pair();
        let secret = "00".repeat(32);

        assert!(!format!("{:?}", pair).contains(&secret));
        let view = serde_json::to_string(&pair.public_view()).unwrap();
        assert!(!view.contains(&secret));
        assert!(view.contains(pair.server_seed_hash()));
    }

    #[test]
    fn test_next_nonce_is_zero_based() {
        let mut pair = zero_pair();
        assert_eq!(pair.next_nonce().unwrap(), 0);
        assert_eq!(pair.next_nonce().unwrap(), 1);
        assert_eq!(pair.nonce(), 2);
    }

    #[test]
    fn test_consume_nonce_rejects_reuse_and_skips() {
        let mut pair = zero_pair();
        pair.consume_nonce(0).unwrap();

        assert_eq!(
            pair.consume_nonce(0),
            Err(FairnessError::NonceReuse {
                expected: 1,
                actual: 0
            })
        );
        assert!(pair.consume_nonce(5).is_err());
        pair.consume_nonce(1).unwrap();
    }

    #[test]
    fn test_revealed_pair_is_inactive() {
        let mut pair = zero_pair();
        pair.reveal().unwrap();

        assert!(!pair.is_active());
        assert_eq!(pair.revealed_server_seed(), Some("00".repeat(32)));
        assert!(matches!(pair.next_nonce(), Err(FairnessError::PairInactive { .. })));
        assert!(pair.reveal().is_err());
    }

    #[test]
    fn test_rotate_twice() {
        let first = SeedPair::generate(None, 16).unwrap();
        let r1 = first.rotate(None, 16).unwrap();
        let r2 = r1.new.clone().rotate(Some("lucky".to_string()), 16).unwrap();

        let seeds = [
            r1.revealed.revealed_server_seed().unwrap(),
            r2.revealed.revealed_server_seed().unwrap(),
            r2.new.server_seed.to_hex(),
        ];
        assert_ne!(seeds[0], seeds[1]);
        assert_ne!(seeds[1], seeds[2]);
        assert_ne!(seeds[0], seeds[2]);
        assert!(r1.revealed.revealed_at().is_some());
        assert!(r2.revealed.revealed_at().is_some());
        assert!(r2.new.is_active() && r2.new.revealed_at().is_none());
        assert_eq!(r2.new.client_seed(), "lucky");
    }

    #[test]
    fn test_client_seed_validation() {
        assert!(validate_client_seed("player-chosen").is_ok());
        assert!(validate_client_seed("").is_err());
        assert!(validate_client_seed("a:1").is_err());
        assert!(validate_client_seed(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_serde_roundtrip_keeps_commitment() {
        let mut pair = zero_pair();
        pair.next_nonce().unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        let back: SeedPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair);
        assert!(back.verify_commitment());
    }

    #[test]
    fn test_tampered_hash_rejected_on_load() {
        let mut pair = zero_pair();
        pair.reveal().unwrap();
        let mut record = serde_json::to_value(&pair).unwrap();
        record["server_seed_hash"] = serde_json::Value::String(hash::sha256_hex(b"forged"));

        let err = serde_json::from_value::<SeedPair>(record).unwrap_err();
        assert!(err.to_string().contains("does not match"));

        let back: SeedPair = serde_json::from_value(serde_json::to_value(&pair).unwrap()).unwrap();
        assert_eq!(back.revealed_at(), pair.revealed_at());
    }
}
