pub mod errors;
pub mod features;
pub mod grade;
pub mod graph;
pub mod hold;
pub mod model;
