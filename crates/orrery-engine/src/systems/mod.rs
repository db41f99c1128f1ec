pub mod orbits;
pub mod starfield;
