use std::sync::Arc;

use crate::application::dto::ConfigResponse;
use crate::application::services::GradingService;

/// Estado compartido para los manejadores HTTP de Axum.
/// Siguiendo la Arquitectura Hexagonal, el estado contiene el servicio
/// (Caso de Uso) y la configuración efectiva de los modelos.
#[derive(Clone)]
pub struct HttpState {
    /// Servicio que orquesta descarga, detección, grafo y clasificación.
    pub grading: Arc<GradingService>,
    /// Configuración resuelta al arranque, expuesta en /api/config.
    pub config: ConfigResponse,
}
