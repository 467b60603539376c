use thiserror::Error;

use super::config::ConfigError;
use crate::core::formfactor::table::FormFactorError;
use crate::core::models::bead::BeadError;
use crate::core::models::residue::ResidueError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Bead(#[from] BeadError),

    #[error(transparent)]
    Residue(#[from] ResidueError),

    #[error(transparent)]
    FormFactor(#[from] FormFactorError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Length mismatch: {what} has {found} entries, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Structure contains no beads")]
    EmptyStructure,

    #[error("Ensemble contains no conformers")]
    EmptyEnsemble,

    #[error("Non-finite coordinate for bead {bead} of conformer {conformer}")]
    NonFiniteCoordinate { conformer: usize, bead: usize },

    #[error(
        "Replacing bead {bead_id} of a {chain_len}-bead chain is not supported; only the first or last bead can be replaced"
    )]
    UnsupportedBead { bead_id: isize, chain_len: usize },

    #[error("A chain needs at least two beads to be spliced, got {len}")]
    ChainTooShort { len: usize },

    #[error("Bead {index} has size {size}; bead sizes must be positive and finite")]
    InvalidBeadSize { index: usize, size: f64 },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}
