//! # Form Factors
//!
//! Coarse-grained residue form factors tabulated on a uniform `q` grid (for the
//! reference tables, 0.0 to 0.5 1/Angstrom) and queried through linear interpolation.
//! Values outside the tabulated grid are held at the nearest tabulated value.
//!
//! Tables are loaded once into an immutable [`table::FormFactorTable`] that is shared
//! by reference between all curve computations, including parallel ones.

pub mod interpolation;
pub mod table;
