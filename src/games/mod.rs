//! Outcome generators, one pure function per game.
//!
//! Every generator derives from HMAC-SHA256 keyed with the server seed over
//! `"{client_seed}:{nonce}"` (mines adds `":{sub_index}"`).

pub mod types;
pub mod dice;
pub mod crash;
pub mod mines;
pub mod limbo;
pub mod plinko;

pub use types::*;
pub use dice::generate_dice_result;
pub use crash::generate_crash_point;
pub use mines::{generate_mine_positions, mines_multiplier};
pub use limbo::generate_limbo_result;
pub use plinko::generate_plinko_path;

use crate::errors::FairResult;

/// Check parameters without hashing anything
pub fn validate_params(params: &GameParams) -> FairResult<()> {
    match params {
        GameParams::Dice(p) => dice::validate(p),
        GameParams::Crash(p) => crash::validate(p),
        GameParams::Mines(p) => mines::validate(p),
        GameParams::Limbo(p) => limbo::validate(p),
        GameParams::Plinko(p) => plinko::validate(p),
    }
}

/// Dispatch to the generator for `params`
pub fn generate_outcome(seeds: SeedTriple<'_>, params: &GameParams) -> FairResult<GameOutcome> {
    Ok(match params {
        GameParams::Dice(p) => GameOutcome::Dice(generate_dice_result(seeds, p)?),
        GameParams::Crash(p) => GameOutcome::Crash(generate_crash_point(seeds, p)?),
        GameParams::Mines(p) => GameOutcome::Mines(generate_mine_positions(seeds, p)?),
        GameParams::Limbo(p) => GameOutcome::Limbo(generate_limbo_result(seeds, p)?),
        GameParams::Plinko(p) => GameOutcome::Plinko(generate_plinko_path(seeds, p)?),
    })
}
