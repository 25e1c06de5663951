use async_trait::async_trait;
use std::path::Path;

use crate::application::ports::ModelCatalogPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::ModelId;

/// Comprueba que los artefactos de modelo (redes ONNX y pesos del GNN)
/// existen antes de intentar construir sesión alguna.
pub struct OnnxModelCatalog;

impl OnnxModelCatalog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelCatalogPort for OnnxModelCatalog {
    async fn validate_model(&self, model: &ModelId) -> DomainResult<()> {
        if model.path.trim().is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "ruta vacía para el modelo '{}'",
                model.name
            )));
        }
        if !Path::new(&model.path).exists() {
            return Err(DomainError::NotFound(format!(
                "fichero de modelo '{}' no encontrado: {}",
                model.name, model.path
            )));
        }
        Ok(())
    }
}
