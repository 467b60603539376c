//! # Core Module
//!
//! Stateless building blocks shared by the scattering engine and the workflows.
//!
//! - **Bead Models** ([`models`]) - Residue identities, bead descriptors and curves
//! - **Form Factors** ([`formfactor`]) - Tabulated per-residue scattering strengths
//! - **File I/O** ([`io`]) - PDB structures and CSV coordinate files
//! - **Utilities** ([`utils`]) - Geometry and atom-name classification helpers

pub mod formfactor;
pub mod io;
pub mod models;
pub mod utils;
