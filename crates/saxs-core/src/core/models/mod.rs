pub mod bead;
pub mod curve;
pub mod residue;
