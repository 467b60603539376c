pub mod coords;
pub mod pdb;
