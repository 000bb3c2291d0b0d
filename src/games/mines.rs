use super::types::{MinesOutcome, MinesParams, SeedTriple, HOUSE_EDGE};
use crate::errors::{FairResult, FairnessError};
use crate::hash;

/// Draw budget floor; small boards always get at least this many draws
pub const MAX_MINE_DRAWS: u32 = 1024;

/// Draws granted per tile on large boards. Collecting all but one of `n`
/// tiles takes about `n * ln(n)` draws, and `32 * n` leaves a tail below 1e-11
/// for every grid up to `MAX_GRID_SIZE`.
pub const DRAWS_PER_TILE: u32 = 32;

pub const MAX_GRID_SIZE: u32 = 256;

pub fn validate(params: &MinesParams) -> FairResult<()> {
    if params.grid_size < 2 || params.grid_size > MAX_GRID_SIZE {
        return Err(FairnessError::invalid_parameter(
            "mines.grid_size",
            params.grid_size,
            format!("must be in 2..={}", MAX_GRID_SIZE),
        ));
    }
    if params.mines_count == 0 || params.mines_count >= params.grid_size {
        return Err(FairnessError::invalid_parameter(
            "mines.mines_count",
            params.mines_count,
            format!("must be in 1..{}", params.grid_size),
        ));
    }
    Ok(())
}

/// Sub-index draws allowed before sampling gives up
pub fn draw_limit(grid_size: u32) -> u32 {
    grid_size.saturating_mul(DRAWS_PER_TILE).max(MAX_MINE_DRAWS)
}

/// Mine positions for the triple, sorted ascending.
///
/// Draw `i` hashes `"{client}:{nonce}:{i}"` and maps it to
/// `floor(float * grid_size)`; duplicates are skipped until `mines_count`
/// distinct positions exist.
pub fn generate_mine_positions(seeds: SeedTriple<'_>, params: &MinesParams) -> FairResult<MinesOutcome> {
    validate(params)?;

    let mut taken = vec![false; params.grid_size as usize];
    let mut positions = Vec::with_capacity(params.mines_count as usize);
    let mut draws = 0u32;
    let limit = draw_limit(params.grid_size);

    while positions.len() < params.mines_count as usize {
        if draws >= limit {
            return Err(FairnessError::MinesDrawLimit { draws });
        }
        let float = hash::hash_to_unit_float(&seeds.sub_digest_hex(draws)?)?;
        draws += 1;

        // A float of exactly 1.0 would land one past the grid
        let position = ((float * params.grid_size as f64).floor() as u32).min(params.grid_size - 1);
        if !taken[position as usize] {
            taken[position as usize] = true;
            positions.push(position);
        }
    }
    positions.sort_unstable();

    Ok(MinesOutcome {
        positions,
        fingerprint: seeds.digest_hex()?,
        draws,
    })
}

/// Cash-out multiplier after `safe_revealed` safe tiles have been opened.
///
/// Fair odds are `C(grid, k) / C(grid - mines, k)`, reduced by the house edge.
pub fn mines_multiplier(params: &MinesParams, safe_revealed: u32) -> FairResult<f64> {
    validate(params)?;
    let safe_tiles = params.grid_size - params.mines_count;
    if safe_revealed > safe_tiles {
        return Err(FairnessError::invalid_parameter(
            "mines.safe_revealed",
            safe_revealed,
            format!("only {} safe tiles exist", safe_tiles),
        ));
    }

    let odds = (0..safe_revealed).fold(1.0, |acc, i| {
        acc * f64::from(params.grid_size - i) / f64::from(safe_tiles - i)
    });
    Ok((1.0 - HOUSE_EDGE) * odds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_SEED: [u8; 32] = [0u8; 32];

    #[test]
    fn test_golden_positions() {
        let seeds = SeedTriple::new(&ZERO_SEED, "test", 0);
        let outcome = generate_mine_positions(seeds, &MinesParams::new(3)).unwrap();

        assert_eq!(outcome.positions, vec![10, 17, 20]);
        assert_eq!(outcome.draws, 3);
        assert_eq!(
            outcome.fingerprint,
            "d1e37c0c10bc71139e7d751762c8d74017940fe39e114eec35a96f471a41514f"
        );
        assert!(outcome.is_mine(17));
        assert!(!outcome.is_mine(0));
    }

    #[test]
    fn test_nearly_full_board() {
        let params = MinesParams::new(24);
        for nonce in 0..50u64 {
            let seeds = SeedTriple::new(&ZERO_SEED, "dense", nonce);
            let outcome = generate_mine_positions(seeds, &params).unwrap();
            assert_eq!(outcome.positions.len(), 24);
            assert!(outcome.positions.windows(2).all(|w| w[0] < w[1]));
            assert!(outcome.positions.iter().all(|&p| p < 25));
            assert!(outcome.draws >= 24);
        }
    }

    #[test]
    fn test_largest_board_fills_within_limit() {
        let params = MinesParams {
            mines_count: MAX_GRID_SIZE - 1,
            grid_size: MAX_GRID_SIZE,
        };
        assert!(validate(&params).is_ok());
        for nonce in 0..20u64 {
            let seeds = SeedTriple::new(&ZERO_SEED, "dense", nonce);
            let outcome = generate_mine_positions(seeds, &params).unwrap();
            assert_eq!(outcome.positions.len(), 255);
            assert!(outcome.draws <= draw_limit(MAX_GRID_SIZE));
        }
    }

    #[test]
    fn test_draw_limit_scales_with_grid() {
        assert_eq!(draw_limit(25), MAX_MINE_DRAWS);
        assert_eq!(draw_limit(256), 8192);
    }

    #[test]
    fn test_invalid_counts() {
        let seeds = SeedTriple::new(&ZERO_SEED, "test", 0);
        for (mines_count, grid_size) in [(0, 25), (25, 25), (30, 25), (1, 1), (1, 300)] {
            let params = MinesParams {
                mines_count,
                grid_size,
            };
            assert!(matches!(
                generate_mine_positions(seeds, &params),
                Err(FairnessError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_multiplier() {
        let params = MinesParams::new(1);
        assert!((mines_multiplier(&params, 0).unwrap() - 0.99).abs() < 1e-12);
        // 25/24 fair odds for the first pick with one mine
        assert!((mines_multiplier(&params, 1).unwrap() - 0.99 * 25.0 / 24.0).abs() < 1e-12);
        assert!(mines_multiplier(&params, 25).is_err());

        let dense = MinesParams::new(24);
        assert!((mines_multiplier(&dense, 1).unwrap() - 0.99 * 25.0).abs() < 1e-9);
    }
}
