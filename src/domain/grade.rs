use serde::{Deserialize, Serialize};

/// Respuesta degradada cuando el grafo no tiene aristas que propagar:
/// demasiado pocas presas del color pedido, o demasiado separadas.
pub const INSUFFICIENT_GRAPH_GRADE: &str = "Unpredictable - insufficient graph data";

/// Grado discreto predicho para una ruta, en escala V.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradePrediction {
    pub class_index: usize,
    pub label: String,
}

impl GradePrediction {
    pub fn from_class(class_index: usize) -> Self {
        Self {
            label: grade_label(class_index),
            class_index,
        }
    }
}

pub fn grade_label(class_index: usize) -> String {
    format!("V{class_index}")
}
