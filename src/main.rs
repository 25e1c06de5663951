mod adapters;
mod application;
mod domain;

use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::adapters::{
    fetch::image_source::HttpImageSource,
    gnn::classifier::GcnClassifier,
    http::{router, state::HttpState},
    onnx::{hold_detector::OnnxHoldDetector, model_catalog::OnnxModelCatalog},
};
use crate::application::dto::ConfigResponse;
use crate::application::ports::ModelCatalogPort;
use crate::application::services::GradingService;
use crate::domain::model::{DetectorParams, GnnDims, ModelId};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Inicializar logs (RUST_LOG=info por defecto)
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    // 2. Rutas de artefactos, configurables por entorno (mismos modelos
    //    que el despliegue original)
    let color_model = ModelId {
        name: "hold-color".into(),
        path: env_or("COLOR_MODEL_PATH", "models/colorbestv1.onnx"),
    };
    let type_model = ModelId {
        name: "hold-type".into(),
        path: env_or("TYPE_MODEL_PATH", "models/holdsbestv2.onnx"),
    };
    let gnn_weights = ModelId {
        name: "route-gnn".into(),
        path: env_or("GNN_WEIGHTS_PATH", "models/route_gnn_weights.json"),
    };

    // 3. Validar los artefactos antes de construir ninguna sesión
    let catalog = OnnxModelCatalog::new();
    for model in [&color_model, &type_model, &gnn_weights] {
        catalog.validate_model(model).await?;
    }

    tracing::info!("🔧 Cargando modelos de detección y pesos del clasificador...");

    // 4. Cargar modelos una sola vez; se comparten en sólo lectura entre
    //    peticiones (Arc, inferencia sin mutación de parámetros)
    let params = DetectorParams::default();
    let detector = Arc::new(OnnxHoldDetector::load(
        &color_model.path,
        &type_model.path,
        params.clone(),
    )?);
    let classifier = Arc::new(GcnClassifier::load(&gnn_weights.path, GnnDims::default())?);
    let images = Arc::new(HttpImageSource::new());

    // 5. Servicio de aplicación y estado de la API
    let grading = Arc::new(GradingService::new(images, detector, classifier));
    let state = HttpState {
        grading,
        config: ConfigResponse {
            color_model: color_model.path,
            type_model: type_model.path,
            gnn_weights: gnn_weights.path,
            input_size: params.input_size,
            conf_threshold: params.conf_threshold,
            max_detections: params.max_detections,
        },
    };

    // 6. Router de Axum y archivos estáticos del dashboard
    let app = router(state).fallback_service(ServeDir::new("static"));

    let port = env_or("PORT", "8090");
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("🚀 Servidor de graduación de rutas en http://{}", addr);
    tracing::info!("📂 Archivos estáticos servidos desde la carpeta './static'");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
