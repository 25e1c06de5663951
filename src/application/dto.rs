use serde::{Deserialize, Serialize};

use crate::application::services::RouteAnalysis;
use crate::domain::grade::INSUFFICIENT_GRAPH_GRADE;
use crate::domain::hold::WallSize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    pub img_url: String,
    pub target_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResponse {
    pub grade: String,
    pub hold_count: usize,
    pub wall: WallSize,
}

impl From<RouteAnalysis> for GradeResponse {
    fn from(analysis: RouteAnalysis) -> Self {
        Self {
            grade: analysis
                .grade
                .map(|g| g.label)
                .unwrap_or_else(|| INSUFFICIENT_GRAPH_GRADE.to_string()),
            hold_count: analysis.holds.len(),
            wall: analysis.wall,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub color_model: String,
    pub type_model: String,
    pub gnn_weights: String,
    pub input_size: u32,
    pub conf_threshold: f32,
    pub max_detections: usize,
}
