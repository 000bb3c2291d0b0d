//! Configuration management with validation and defaults
//!
//! Loaded from TOML with `FAIRSEED_*` environment overrides. Nothing in here
//! changes how outcomes are derived; it only bounds what the engine accepts.

use crate::errors::{FairResult, FairnessError};
use crate::games::{mines, plinko, GameParams, MAX_MULTIPLIER};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Top-level engine configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FairnessConfig {
    #[serde(default)]
    pub seeds: SeedConfig,
    #[serde(default)]
    pub limits: GameLimits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Seed generation settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeedConfig {
    /// Random bytes behind a generated client seed (hex encoded, so the
    /// seed string is twice as long)
    pub client_seed_bytes: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            client_seed_bytes: 16,
        }
    }
}

/// Product limits checked by the engine before any hashing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameLimits {
    pub min_plinko_rows: u32,
    pub max_plinko_rows: u32,
    pub mines_grid_size: u32,
    /// Most mines a player may place on the grid
    pub max_mines: u32,
    /// Highest cash-out or limbo target accepted
    pub max_target_multiplier: f64,
}

impl Default for GameLimits {
    fn default() -> Self {
        Self {
            min_plinko_rows: 8,
            max_plinko_rows: 16,
            mines_grid_size: 25,
            max_mines: 24,
            max_target_multiplier: 10_000.0,
        }
    }
}

impl GameLimits {
    /// Check product limits on top of each generator's own domain checks
    pub fn check(&self, params: &GameParams) -> FairResult<()> {
        match params {
            GameParams::Plinko(p) => {
                if p.rows < self.min_plinko_rows || p.rows > self.max_plinko_rows {
                    return Err(FairnessError::invalid_parameter(
                        "plinko.rows",
                        p.rows,
                        format!(
                            "this table offers {}..={} rows",
                            self.min_plinko_rows, self.max_plinko_rows
                        ),
                    ));
                }
            }
            GameParams::Mines(p) => {
                if p.grid_size != self.mines_grid_size {
                    return Err(FairnessError::invalid_parameter(
                        "mines.grid_size",
                        p.grid_size,
                        format!("this table uses a {} tile grid", self.mines_grid_size),
                    ));
                }
                if p.mines_count > self.max_mines {
                    return Err(FairnessError::invalid_parameter(
                        "mines.mines_count",
                        p.mines_count,
                        format!("this table allows at most {} mines", self.max_mines),
                    ));
                }
            }
            GameParams::Crash(p) => self.check_target("crash.cashout_at", p.cashout_at)?,
            GameParams::Limbo(p) => self.check_target("limbo.target", p.target)?,
            GameParams::Dice(_) => {}
        }
        Ok(())
    }

    fn check_target(&self, field: &str, target: Option<f64>) -> FairResult<()> {
        match target {
            Some(t) if t > self.max_target_multiplier => Err(FairnessError::invalid_parameter(
                field,
                t,
                format!("must not exceed {:.2}", self.max_target_multiplier),
            )),
            _ => Ok(()),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "fairseed=info".to_string(),
        }
    }
}

impl FairnessConfig {
    /// Validate configuration for logical consistency
    pub fn validate(&self) -> FairResult<()> {
        if self.seeds.client_seed_bytes < 8 || self.seeds.client_seed_bytes > 32 {
            return Err(FairnessError::Configuration(format!(
                "seeds.client_seed_bytes must be in 8..=32, got {}",
                self.seeds.client_seed_bytes
            )));
        }

        let limits = &self.limits;
        if limits.min_plinko_rows == 0
            || limits.min_plinko_rows > limits.max_plinko_rows
            || limits.max_plinko_rows > plinko::MAX_ROWS
        {
            return Err(FairnessError::Configuration(format!(
                "plinko rows {}..={} must lie within 1..={}",
                limits.min_plinko_rows,
                limits.max_plinko_rows,
                plinko::MAX_ROWS
            )));
        }

        if limits.mines_grid_size < 2 || limits.mines_grid_size > mines::MAX_GRID_SIZE {
            return Err(FairnessError::Configuration(format!(
                "limits.mines_grid_size must be in 2..={}, got {}",
                mines::MAX_GRID_SIZE,
                limits.mines_grid_size
            )));
        }

        if limits.max_mines == 0 || limits.max_mines >= limits.mines_grid_size {
            return Err(FairnessError::Configuration(format!(
                "limits.max_mines must be in 1..{}, got {}",
                limits.mines_grid_size, limits.max_mines
            )));
        }

        if !(limits.max_target_multiplier > 1.0 && limits.max_target_multiplier <= MAX_MULTIPLIER) {
            return Err(FairnessError::Configuration(format!(
                "limits.max_target_multiplier must be in (1, {}]",
                MAX_MULTIPLIER
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(FairnessError::Configuration(
                "logging.filter cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> FairResult<FairnessConfig> {
        let mut config = match self.config_path {
            Some(ref path) => self.load_from_file(path)?,
            None => FairnessConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> FairResult<FairnessConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FairnessError::Configuration(format!("Failed to read {}: {}", path, e)))?;

        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to file
    pub fn save(&self, config: &FairnessConfig, path: &str) -> FairResult<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| FairnessError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| FairnessError::Configuration(format!("Failed to write to {}: {}", path, e)))
    }
}

/// Apply `FAIRSEED_*` overrides using `lookup` as the variable source
pub fn apply_overrides<F>(config: &mut FairnessConfig, lookup: F) -> FairResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(filter) = lookup("FAIRSEED_LOG") {
        config.logging.filter = filter;
    }
    if let Some(value) = lookup("FAIRSEED_CLIENT_SEED_BYTES") {
        config.seeds.client_seed_bytes = parse_var("FAIRSEED_CLIENT_SEED_BYTES", value)?;
    }
    if let Some(value) = lookup("FAIRSEED_MAX_PLINKO_ROWS") {
        config.limits.max_plinko_rows = parse_var("FAIRSEED_MAX_PLINKO_ROWS", value)?;
    }
    if let Some(value) = lookup("FAIRSEED_MINES_GRID_SIZE") {
        config.limits.mines_grid_size = parse_var("FAIRSEED_MINES_GRID_SIZE", value)?;
    }
    if let Some(value) = lookup("FAIRSEED_MAX_MINES") {
        config.limits.max_mines = parse_var("FAIRSEED_MAX_MINES", value)?;
    }
    Ok(())
}

fn parse_var<T: std::str::FromStr>(field: &str, value: String) -> FairResult<T> {
    value.trim().parse().map_err(|_| FairnessError::InvalidParameter {
        field: field.to_string(),
        value,
        reason: "Invalid numeric value".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{LimboParams, MinesParams, PlinkoParams};
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FairnessConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = FairnessConfig::default();
        config.limits.min_plinko_rows = 20;
        assert!(config.validate().is_err());

        let mut config = FairnessConfig::default();
        config.seeds.client_seed_bytes = 2;
        assert!(config.validate().is_err());

        let mut config = FairnessConfig::default();
        config.limits.max_mines = 25;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_limits_check() {
        let limits = GameLimits::default();
        assert!(limits.check(&GameParams::Plinko(PlinkoParams { rows: 8 })).is_ok());
        assert!(limits.check(&GameParams::Plinko(PlinkoParams { rows: 4 })).is_err());
        assert!(limits
            .check(&GameParams::Mines(MinesParams { mines_count: 3, grid_size: 36 }))
            .is_err());

        let capped = GameLimits {
            max_mines: 10,
            ..GameLimits::default()
        };
        assert!(capped.check(&GameParams::Mines(MinesParams::new(10))).is_ok());
        assert!(matches!(
            capped.check(&GameParams::Mines(MinesParams::new(11))),
            Err(FairnessError::InvalidParameter { .. })
        ));
        assert!(limits
            .check(&GameParams::Limbo(LimboParams { target: Some(50_000.0) }))
            .is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FAIRSEED_LOG", "fairseed=debug"),
            ("FAIRSEED_MAX_PLINKO_ROWS", "12"),
            ("FAIRSEED_MAX_MINES", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = FairnessConfig::default();
        apply_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.logging.filter, "fairseed=debug");
        assert_eq!(config.limits.max_plinko_rows, 12);
        assert_eq!(config.limits.max_mines, 5);

        let bad = apply_overrides(&mut config, |k| {
            (k == "FAIRSEED_CLIENT_SEED_BYTES").then(|| "lots".to_string())
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: FairnessConfig = toml::from_str("[seeds]\nclient_seed_bytes = 24\n").unwrap();
        assert_eq!(config.seeds.client_seed_bytes, 24);
        assert_eq!(config.limits, GameLimits::default());
    }

    #[test]
    fn test_save_and_load_config() -> FairResult<()> {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let mut original = FairnessConfig::default();
        original.limits.max_plinko_rows = 14;

        let loader = ConfigLoader::new();
        loader.save(&original, path)?;
        let loaded = ConfigLoader::new().with_path(path).load_from_file(path)?;

        assert_eq!(loaded, original);
        Ok(())
    }
}
