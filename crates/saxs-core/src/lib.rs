//! # saxsbead Core Library
//!
//! Small-angle X-ray scattering (SAXS) intensity curves for coarse-grained protein
//! models, where every residue is represented by one bead (at the C-alpha site) or by
//! two beads (backbone site and side-chain centre of electrons).
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Residue identities, bead models, tabulated form
//!   factors with linear interpolation, geometry helpers and structure/coordinate I/O.
//!
//! - **[`engine`]: The Numerical Core.** Pairwise distance matrices, the Debye
//!   summation over a generalized bead list (single structures and ensembles alike),
//!   the bead-splicing geometry, q-sampling configuration and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Named entry points for one-bead, two-bead and
//!   blended curves (each with an ensemble-averaged form) and for splicing a folded
//!   domain into generated chains.

pub mod core;
pub mod engine;
pub mod workflows;
