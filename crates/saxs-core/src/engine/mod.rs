//! # Engine Module
//!
//! Numerical kernels behind the public workflows.
//!
//! ## Overview
//!
//! Every scattering curve, whatever its bead model, is computed by one routine
//! ([`debye::evaluate_curve`]) over a list of resolved beads and one or more conformers.
//! Bead replacement ([`splice`]) is the only operation that draws random numbers.
//!
//! - **Configuration** ([`config`]) - `q` sampling and table locations
//! - **Distances** ([`distance`]) - Pairwise distance matrices and ensemble-averaged sinc terms
//! - **Debye Sums** ([`debye`]) - The generalized intensity calculation
//! - **Splicing** ([`splice`]) - Rigid placement of a conglomerate at a chain end
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine error type

pub mod config;
pub mod debye;
pub mod distance;
pub mod error;
pub mod progress;
pub mod splice;
