pub mod grid;
pub mod noise;
