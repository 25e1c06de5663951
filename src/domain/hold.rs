use serde::{Deserialize, Serialize};

/// Vocabulario cerrado de tipos de agarre que conoce el clasificador.
/// El orden es significativo: fija la posición del one-hot y coincide
/// con las clases del modelo de tipo de presa.
pub const GRIP_TYPES: [&str; 5] = ["jug", "crimp", "sloper", "pinch", "edge"];

/// Presa detectada sobre la imagen del muro. Centro y tamaño en píxeles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hold {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Etiqueta de tipo de agarre, "unknown" si el modelo no la reconoce.
    pub grip: String,
}

/// Dimensiones en píxeles de la imagen del muro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallSize {
    pub width: u32,
    pub height: u32,
}

/// Resultado de buscar una etiqueta en el vocabulario de agarres.
/// `Unknown` se codifica como one-hot todo a cero: la presa aporta
/// geometría pero ninguna señal categórica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripLookup {
    Known(usize),
    Unknown,
}

pub fn lookup_grip(label: &str) -> GripLookup {
    match GRIP_TYPES.iter().position(|t| *t == label) {
        Some(idx) => GripLookup::Known(idx),
        None => GripLookup::Unknown,
    }
}

impl GripLookup {
    pub fn one_hot(self) -> [f32; GRIP_TYPES.len()] {
        let mut encoded = [0.0; GRIP_TYPES.len()];
        if let GripLookup::Known(idx) = self {
            encoded[idx] = 1.0;
        }
        encoded
    }
}
