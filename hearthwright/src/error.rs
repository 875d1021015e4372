// Error types for house generation.
//
// Three layers, matching how failures are treated:
// - `ConfigError`: bad static data (templates, themes, config JSON). Fatal,
//   surfaced when the registry or config is loaded.
// - `WorldError`: the world store could not be reached or answered with
//   something unusable. Propagated; the build stops where it is.
// - `HouseError`: everything a house build can fail with, wrapping the two
//   above plus broken invariants.
//
// Geometry ambiguity (no outer wall, no access height) and rejected
// placements are not errors: they are recorded in the
// `BuildReport` and generation carries on. See `report.rs`.

use thiserror::Error;

/// Invalid static configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown placeholder {{{name}}} in block template {template:?}")]
    UnknownPlaceholder { name: String, template: String },

    #[error("unterminated placeholder in block template {0:?}")]
    UnterminatedPlaceholder(String),

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The world store failed to answer a query or placement.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world store unavailable: {0}")]
    Unavailable(String),

    #[error("world store cannot hold more than {0} distinct block ids")]
    TooManyBlocks(usize),
}

/// Anything a house build can fail with.
#[derive(Debug, Error)]
pub enum HouseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("footprint {x_size}x{z_size} is too small: need more than {unit_size} blocks per side")]
    FootprintTooSmall {
        x_size: u32,
        z_size: u32,
        unit_size: i32,
    },

    #[error("invariant violated: {0}")]
    Invariant(String),
}
