//! Simulation configuration and its lenient TOML loader.
//!
//! [`SimulationConfig`] is built once, before any worker starts, and shared
//! read-only by the whole group. The file layout is:
//!
//! ```toml
//! [general]
//! grid_size = 32
//! generations = 32
//! stats_every = 1
//! data_every = 1
//!
//! [id]
//! random_seed = 64
//! id_type = "random"   # or "glider"
//! ```
//!
//! Every field is optional; a missing field takes its default. A field with
//! the wrong type or an out-of-range value also takes its default and logs
//! a warning, so loading never fails because of a single field.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use toml::{Table, Value};
use tracing::warn;

use crate::error::ConfigError;

// ── InitialPattern ─────────────────────────────────────────────────

/// How rows are filled before generation 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialPattern {
    /// Every owned cell drawn uniformly from {0, 1}, seeded per worker.
    #[default]
    Random,
    /// A single glider in the top-left corner of the global grid.
    Glider,
}

impl fmt::Display for InitialPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Glider => write!(f, "glider"),
        }
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Immutable parameters of one simulation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Side length of the square global grid. Default: 32.
    pub grid_size: usize,
    /// Number of generations to run. Default: 32.
    pub generations: u64,
    /// Report the global live-cell count every this many generations. Default: 1.
    pub stats_every: u64,
    /// Write snapshot artifacts every this many generations. Default: 1.
    pub data_every: u64,
    /// Base seed for the random pattern; each worker adds its index. Default: 64.
    pub random_seed: u64,
    /// Initial pattern. Default: [`InitialPattern::Random`].
    pub pattern: InitialPattern,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 32,
            generations: 32,
            stats_every: 1,
            data_every: 1,
            random_seed: 64,
            pattern: InitialPattern::Random,
        }
    }
}

/// Raw document shape. Sections must be tables; their fields are picked
/// out one by one so that a bad field cannot fail the whole load.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    general: Table,
    #[serde(default)]
    id: Table,
}

impl SimulationConfig {
    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse a TOML document, falling back to defaults field by field.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let defaults = Self::default();

        let grid_size = positive(&raw.general, "general", "grid_size", defaults.grid_size as u64);
        let grid_size = usize::try_from(grid_size).unwrap_or_else(|_| {
            warn!(grid_size, "general.grid_size does not fit in usize, using default");
            defaults.grid_size
        });

        Ok(Self {
            grid_size,
            generations: positive(&raw.general, "general", "generations", defaults.generations),
            stats_every: positive(&raw.general, "general", "stats_every", defaults.stats_every),
            data_every: positive(&raw.general, "general", "data_every", defaults.data_every),
            random_seed: seed(&raw.id, defaults.random_seed),
            pattern: pattern(&raw.id, defaults.pattern),
        })
    }

    /// Check the invariants a hand-built config might break.
    ///
    /// Configs produced by [`from_toml_str`](Self::from_toml_str) always
    /// pass, since invalid fields were already replaced by defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::NonPositive { field: "grid_size" });
        }
        if self.generations == 0 {
            return Err(ConfigError::NonPositive {
                field: "generations",
            });
        }
        if self.stats_every == 0 {
            return Err(ConfigError::NonPositive {
                field: "stats_every",
            });
        }
        if self.data_every == 0 {
            return Err(ConfigError::NonPositive { field: "data_every" });
        }
        Ok(())
    }
}

fn positive(section: &Table, section_name: &str, key: &str, default: u64) -> u64 {
    match section.get(key) {
        None => default,
        Some(Value::Integer(v)) if *v > 0 => *v as u64,
        Some(other) => {
            let field = format!("{section_name}.{key}");
            warn!(
                field = %field,
                value = %other,
                default,
                "expected a positive integer, using default"
            );
            default
        }
    }
}

fn seed(section: &Table, default: u64) -> u64 {
    match section.get("random_seed") {
        None => default,
        // Negative seeds wrap; only the bit pattern matters to the RNG.
        Some(Value::Integer(v)) => *v as u64,
        Some(other) => {
            warn!(value = %other, default, "id.random_seed is not an integer, using default");
            default
        }
    }
}

fn pattern(section: &Table, default: InitialPattern) -> InitialPattern {
    match section.get("id_type") {
        None => default,
        Some(value) => value.clone().try_into().unwrap_or_else(|_| {
            warn!(
                value = %value,
                %default,
                "id.id_type is not \"random\" or \"glider\", using default"
            );
            default
        }),
    }
}
