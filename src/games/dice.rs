use super::types::{round2, DiceOutcome, DiceParams, SeedTriple, Settlement, HOUSE_EDGE};
use crate::errors::{FairResult, FairnessError};

pub fn validate(params: &DiceParams) -> FairResult<()> {
    if !params.target.is_finite() || params.target <= 0.0 || params.target >= 100.0 {
        return Err(FairnessError::invalid_parameter(
            "dice.target",
            params.target,
            "must be in (0, 100) exclusive",
        ));
    }
    Ok(())
}

/// Roll in `[0, 100]` with two decimals, settled against the target
pub fn generate_dice_result(seeds: SeedTriple<'_>, params: &DiceParams) -> FairResult<DiceOutcome> {
    validate(params)?;

    let roll = round2(seeds.unit_float()? * 100.0);
    let win = if params.is_over {
        roll > params.target
    } else {
        roll < params.target
    };
    let win_chance = win_chance(params);
    let settlement = if win {
        Settlement::win(payout_multiplier(win_chance))
    } else {
        Settlement::loss()
    };

    Ok(DiceOutcome {
        roll,
        win_chance,
        settlement,
    })
}

/// Win chance in percent
pub fn win_chance(params: &DiceParams) -> f64 {
    if params.is_over {
        100.0 - params.target
    } else {
        params.target
    }
}

pub fn payout_multiplier(win_chance: f64) -> f64 {
    (1.0 - HOUSE_EDGE) * 100.0 / win_chance
}
