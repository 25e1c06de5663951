use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::ImageSourcePort;
use crate::domain::errors::{DomainError, DomainResult};

/// Descarga la foto del muro por URL. Una respuesta no-2xx se trata como
/// entrada inválida del usuario, no como fallo interno.
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

#[async_trait]
impl ImageSourcePort for HttpImageSource {
    async fn fetch(&self, url: &str) -> DomainResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::OperationFailed(format!("descarga de imagen: {e}")))?
            .error_for_status()
            .map_err(|e| DomainError::InvalidInput(format!("URL de imagen rechazada: {e}")))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::OperationFailed(format!("lectura de imagen: {e}")))?;
        Ok(bytes.to_vec())
    }
}
