use super::types::{
    round2, validate_multiplier, LimboOutcome, LimboParams, SeedTriple, Settlement, HOUSE_EDGE,
    MAX_MULTIPLIER,
};
use crate::errors::FairResult;

/// Floats below this produce the minimum result of 1.00
const MIN_FLOAT: f64 = 0.01;

pub fn validate(params: &LimboParams) -> FairResult<()> {
    if let Some(target) = params.target {
        validate_multiplier("limbo.target", target)?;
    }
    Ok(())
}

/// Limbo result: `(1 - edge) / float`, floored at 1.00
pub fn generate_limbo_result(seeds: SeedTriple<'_>, params: &LimboParams) -> FairResult<LimboOutcome> {
    validate(params)?;

    let float = seeds.unit_float()?;
    let raw = if float < MIN_FLOAT {
        1.0
    } else {
        (1.0 - HOUSE_EDGE) / float
    };
    let result = round2(raw.clamp(1.0, MAX_MULTIPLIER));

    let settlement = params.target.map(|target| {
        if result >= target {
            Settlement::win(target)
        } else {
            Settlement::loss()
        }
    });

    Ok(LimboOutcome { result, settlement })
}
