use serde::{Deserialize, Serialize};

use crate::domain::features::FEATURE_DIM;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String, // nombre lógico, p.ej. "hold-color"
    pub path: String, // ruta en disco
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorParams {
    pub input_size: u32,       // 640 típico
    pub conf_threshold: f32,   // 0..1
    pub max_detections: usize, // p.ej. 100
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.25,
            max_detections: 100,
        }
    }
}

/// Dimensiones de la arquitectura del clasificador de rutas. Los pesos
/// cargados se validan contra estos valores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GnnDims {
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub num_classes: usize,
}

impl Default for GnnDims {
    fn default() -> Self {
        Self {
            input_dim: FEATURE_DIM,
            hidden_dim: 64,
            num_classes: 10,
        }
    }
}
