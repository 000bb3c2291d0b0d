use super::types::{Direction, PlinkoOutcome, PlinkoParams, SeedTriple};
use crate::errors::{FairResult, FairnessError};

/// One digest byte per row
pub const MAX_ROWS: u32 = 32;

pub fn validate(params: &PlinkoParams) -> FairResult<()> {
    if params.rows == 0 || params.rows > MAX_ROWS {
        return Err(FairnessError::invalid_parameter(
            "plinko.rows",
            params.rows,
            format!("must be in 1..={}", MAX_ROWS),
        ));
    }
    Ok(())
}

/// Ball path from a single digest: row `i` reads hex `[2i, 2i + 2)`, and the
/// parity of that byte picks left (even) or right (odd).
pub fn generate_plinko_path(seeds: SeedTriple<'_>, params: &PlinkoParams) -> FairResult<PlinkoOutcome> {
    validate(params)?;

    let digest = seeds.digest_hex()?;
    let mut path = Vec::with_capacity(params.rows as usize);
    for row in 0..params.rows as usize {
        let pair = &digest[2 * row..2 * row + 2];
        let byte = u8::from_str_radix(pair, 16)
            .map_err(|e| FairnessError::MalformedInput(format!("invalid hex '{}': {}", pair, e)))?;
        path.push(if byte % 2 == 0 {
            Direction::Left
        } else {
            Direction::Right
        });
    }
    let final_slot = path.iter().map(|d| d.as_step()).sum();

    Ok(PlinkoOutcome { path, final_slot })
}
