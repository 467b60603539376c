//! # Workflows Module
//!
//! Public entry points of the library.
//!
//! - **Scattering Curves** ([`scattering`]) - One-bead, two-bead and blended Debye curves,
//!   each for a single structure and for an ensemble of conformers.
//! - **Splicing** ([`splice`]) - Replacing a terminal chain bead by a folded domain, for
//!   one chain or a whole ensemble.
//!
//! Form-factor tables are loaded once (see
//! [`FormFactorTable`](crate::core::formfactor::table::FormFactorTable)) and passed by
//! reference to every call.

pub mod scattering;
pub mod splice;
