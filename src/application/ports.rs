use async_trait::async_trait;

use crate::domain::{
    errors::DomainResult,
    graph::RouteGraph,
    hold::{Hold, WallSize},
    model::ModelId,
};

#[async_trait]
pub trait ImageSourcePort: Send + Sync {
    /// Descarga los bytes de la foto del muro (JPEG/PNG).
    async fn fetch(&self, url: &str) -> DomainResult<Vec<u8>>;
}

#[async_trait]
pub trait HoldDetectorPort: Send + Sync {
    /// Detecta las presas del color pedido sobre la imagen codificada y
    /// devuelve además el tamaño del muro en píxeles. El orden de la lista
    /// es el orden de detección y fija los índices de nodo del grafo.
    async fn detect(
        &self,
        image_bytes: &[u8],
        target_color: &str,
    ) -> DomainResult<(Vec<Hold>, WallSize)>;
}

#[async_trait]
pub trait RouteClassifierPort: Send + Sync {
    /// Devuelve el índice de clase de grado. Requiere un grafo con al
    /// menos un nodo y alguna arista (el llamante lo comprueba antes).
    async fn classify(&self, graph: &RouteGraph) -> DomainResult<usize>;
}

#[async_trait]
pub trait ModelCatalogPort: Send + Sync {
    async fn validate_model(&self, model: &ModelId) -> DomainResult<()>;
}
