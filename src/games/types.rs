use crate::errors::{FairResult, FairnessError};
use crate::hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// House edge applied to every payout-affecting formula (1%)
pub const HOUSE_EDGE: f64 = 0.01;

/// Upper bound for crash and limbo multipliers
pub const MAX_MULTIPLIER: f64 = 1_000_000.0;

/// Supported game types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Dice,
    Crash,
    Mines,
    Limbo,
    Plinko,
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Dice => write!(f, "dice"),
            GameType::Crash => write!(f, "crash"),
            GameType::Mines => write!(f, "mines"),
            GameType::Limbo => write!(f, "limbo"),
            GameType::Plinko => write!(f, "plinko"),
        }
    }
}

/// The committed input triple every generator derives from.
///
/// Borrowed so that callers can hand in either a live pair or a revealed seed
/// being verified without copying the secret.
#[derive(Clone, Copy)]
pub struct SeedTriple<'a> {
    pub server_seed: &'a [u8],
    pub client_seed: &'a str,
    pub nonce: u64,
}

impl<'a> SeedTriple<'a> {
    pub fn new(server_seed: &'a [u8], client_seed: &'a str, nonce: u64) -> Self {
        Self {
            server_seed,
            client_seed,
            nonce,
        }
    }

    /// HMAC of `"{client_seed}:{nonce}"`, hex encoded
    pub fn digest_hex(&self) -> FairResult<String> {
        let message = format!("{}:{}", self.client_seed, self.nonce);
        Ok(hex::encode(hash::hmac_sha256(self.server_seed, message.as_bytes())?))
    }

    /// HMAC of `"{client_seed}:{nonce}:{sub_index}"`, hex encoded
    pub fn sub_digest_hex(&self, sub_index: u32) -> FairResult<String> {
        let message = format!("{}:{}:{}", self.client_seed, self.nonce, sub_index);
        Ok(hex::encode(hash::hmac_sha256(self.server_seed, message.as_bytes())?))
    }

    /// Primary unit float for this triple
    pub fn unit_float(&self) -> FairResult<f64> {
        hash::hash_to_unit_float(&self.digest_hex()?)
    }
}

impl fmt::Debug for SeedTriple<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedTriple")
            .field("server_seed", &"<redacted>")
            .field("client_seed", &self.client_seed)
            .field("nonce", &self.nonce)
            .finish()
    }
}

/// Win/loss and the payout multiplier applied to the stake
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Settlement {
    pub win: bool,
    pub multiplier: f64,
}

impl Settlement {
    pub fn win(multiplier: f64) -> Self {
        Self {
            win: true,
            multiplier,
        }
    }

    pub fn loss() -> Self {
        Self {
            win: false,
            multiplier: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DiceParams {
    pub target: f64,
    pub is_over: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DiceOutcome {
    pub roll: f64,
    pub win_chance: f64,
    pub settlement: Settlement,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CrashParams {
    /// Auto cash-out multiplier; without it the outcome is not settled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cashout_at: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CrashOutcome {
    pub crash_point: f64,
    pub instant_crash: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<Settlement>,
}

pub const DEFAULT_GRID_SIZE: u32 = 25;

fn default_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MinesParams {
    pub mines_count: u32,
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
}

impl MinesParams {
    pub fn new(mines_count: u32) -> Self {
        Self {
            mines_count,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MinesOutcome {
    /// Mine positions, sorted ascending
    pub positions: Vec<u32>,
    /// HMAC of `"{client_seed}:{nonce}"` committed alongside the draw
    pub fingerprint: String,
    /// Number of sub-index draws consumed
    pub draws: u32,
}

impl MinesOutcome {
    pub fn is_mine(&self, position: u32) -> bool {
        self.positions.binary_search(&position).is_ok()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LimboParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LimboOutcome {
    pub result: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<Settlement>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlinkoParams {
    pub rows: u32,
}

/// Plinko step direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn as_step(self) -> u32 {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "L"),
            Direction::Right => write!(f, "R"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlinkoOutcome {
    pub path: Vec<Direction>,
    /// Index into the caller's payout table, in `[0, rows]`
    pub final_slot: u32,
}

/// Game parameters (discriminated union)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameParams {
    Dice(DiceParams),
    Crash(CrashParams),
    Mines(MinesParams),
    Limbo(LimboParams),
    Plinko(PlinkoParams),
}

impl GameParams {
    pub fn game_type(&self) -> GameType {
        match self {
            GameParams::Dice(_) => GameType::Dice,
            GameParams::Crash(_) => GameType::Crash,
            GameParams::Mines(_) => GameType::Mines,
            GameParams::Limbo(_) => GameType::Limbo,
            GameParams::Plinko(_) => GameType::Plinko,
        }
    }
}

/// Game-specific outcome (discriminated union)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameOutcome {
    Dice(DiceOutcome),
    Crash(CrashOutcome),
    Mines(MinesOutcome),
    Limbo(LimboOutcome),
    Plinko(PlinkoOutcome),
}

impl GameOutcome {
    pub fn game_type(&self) -> GameType {
        match self {
            GameOutcome::Dice(_) => GameType::Dice,
            GameOutcome::Crash(_) => GameType::Crash,
            GameOutcome::Mines(_) => GameType::Mines,
            GameOutcome::Limbo(_) => GameType::Limbo,
            GameOutcome::Plinko(_) => GameType::Plinko,
        }
    }

    /// Settlement when the game settles on its own (dice always, crash and
    /// limbo only with a cash-out/target, mines and plinko never)
    pub fn settlement(&self) -> Option<Settlement> {
        match self {
            GameOutcome::Dice(o) => Some(o.settlement),
            GameOutcome::Crash(o) => o.settlement,
            GameOutcome::Limbo(o) => o.settlement,
            GameOutcome::Mines(_) | GameOutcome::Plinko(_) => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Dice(o) => write!(f, "roll {:.2}", o.roll),
            GameOutcome::Crash(o) => write!(f, "crash at {:.2}x", o.crash_point),
            GameOutcome::Limbo(o) => write!(f, "limbo {:.2}x", o.result),
            GameOutcome::Mines(o) => write!(f, "mines at {:?}", o.positions),
            GameOutcome::Plinko(o) => {
                let path: String = o.path.iter().map(|d| d.to_string()).collect();
                write!(f, "plinko {} -> slot {}", path, o.final_slot)
            }
        }
    }
}

/// Round to two decimals, half away from zero
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Validate a multiplier-style threshold (cash-out or limbo target)
pub(crate) fn validate_multiplier(field: &str, value: f64) -> FairResult<()> {
    if !value.is_finite() || value <= 1.0 || value > MAX_MULTIPLIER {
        return Err(FairnessError::invalid_parameter(
            field,
            value,
            format!("must be in (1.00, {:.2}]", MAX_MULTIPLIER),
        ));
    }
    Ok(())
}
