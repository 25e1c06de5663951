pub mod hold_detector;
pub mod model_catalog;
