pub mod classifier;
pub mod weights;
