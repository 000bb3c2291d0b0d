use super::types::{
    round2, validate_multiplier, CrashOutcome, CrashParams, SeedTriple, Settlement, HOUSE_EDGE,
    MAX_MULTIPLIER,
};
use crate::errors::FairResult;
use crate::hash;

/// Probability of the instant-crash branch
pub const INSTANT_CRASH_CHANCE: f64 = 0.01;

/// Hex offset of the secondary slice that decides the instant-crash branch
const INSTANT_CRASH_OFFSET: usize = hash::UNIT_FLOAT_HEX_LEN;

pub fn validate(params: &CrashParams) -> FairResult<()> {
    if let Some(cashout) = params.cashout_at {
        validate_multiplier("crash.cashout_at", cashout)?;
    }
    Ok(())
}

/// Crash point for the triple.
///
/// Both floats come from one HMAC digest: hex `[0, 13)` drives the curve and
/// hex `[13, 26)` decides the instant crash.
pub fn generate_crash_point(seeds: SeedTriple<'_>, params: &CrashParams) -> FairResult<CrashOutcome> {
    validate(params)?;

    let digest = seeds.digest_hex()?;
    let float = hash::hash_to_unit_float(&digest)?;
    let instant = hash::hex_slice_to_unit_float(&digest, INSTANT_CRASH_OFFSET)?;

    let instant_crash = instant < INSTANT_CRASH_CHANCE;
    let raw = if instant_crash {
        1.0
    } else if float >= 1.0 {
        MAX_MULTIPLIER
    } else {
        (1.0 - HOUSE_EDGE) / (1.0 - float)
    };
    let crash_point = round2(raw.clamp(1.0, MAX_MULTIPLIER));

    let settlement = params.cashout_at.map(|cashout| {
        if cashout <= crash_point {
            Settlement::win(cashout)
        } else {
            Settlement::loss()
        }
    });

    Ok(CrashOutcome {
        crash_point,
        instant_crash,
        settlement,
    })
}
