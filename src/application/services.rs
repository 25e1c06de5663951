use std::sync::Arc;

use crate::{
    application::ports::{HoldDetectorPort, ImageSourcePort, RouteClassifierPort},
    domain::{
        errors::DomainResult,
        grade::GradePrediction,
        graph::build_graph,
        hold::{Hold, WallSize},
    },
};

/// Resultado del análisis de una ruta. `grade: None` significa que el
/// grafo no tenía aristas y la clasificación se omitió.
#[derive(Debug, Clone)]
pub struct RouteAnalysis {
    pub holds: Vec<Hold>,
    pub wall: WallSize,
    pub grade: Option<GradePrediction>,
}

/// Orquestador del caso de uso completo: descarga de la foto, detección
/// de presas, construcción del grafo y clasificación de grado.
#[derive(Clone)]
pub struct GradingService {
    images: Arc<dyn ImageSourcePort>,
    detector: Arc<dyn HoldDetectorPort>,
    classifier: Arc<dyn RouteClassifierPort>,
}

impl GradingService {
    pub fn new(
        images: Arc<dyn ImageSourcePort>,
        detector: Arc<dyn HoldDetectorPort>,
        classifier: Arc<dyn RouteClassifierPort>,
    ) -> Self {
        Self {
            images,
            detector,
            classifier,
        }
    }

    /// Analiza una ruta de principio a fin. Un grafo sin aristas (cero o
    /// una presa, o presas demasiado separadas) es un caso esperado: no se
    /// invoca el modelo y se devuelve el resultado degradado.
    pub async fn grade_route(
        &self,
        img_url: &str,
        target_color: &str,
    ) -> DomainResult<RouteAnalysis> {
        let image_bytes = self.images.fetch(img_url).await?;
        let (holds, wall) = self.detector.detect(&image_bytes, target_color).await?;

        tracing::info!(
            "Detectadas {} presas de color '{}' en muro {}x{}",
            holds.len(),
            target_color,
            wall.width,
            wall.height
        );

        let graph = build_graph(&holds, wall)?;

        if graph.edge_count() == 0 {
            tracing::warn!(
                "Grafo sin aristas ({} nodos): se omite la clasificación",
                graph.node_count()
            );
            return Ok(RouteAnalysis {
                holds,
                wall,
                grade: None,
            });
        }

        let class_index = self.classifier.classify(&graph).await?;
        Ok(RouteAnalysis {
            holds,
            wall,
            grade: Some(GradePrediction::from_class(class_index)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{HoldDetectorPort, ImageSourcePort, RouteClassifierPort};
    use crate::domain::errors::{DomainError, DomainResult};
    use crate::domain::graph::RouteGraph;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubImages;

    #[async_trait]
    impl ImageSourcePort for StubImages {
        async fn fetch(&self, _url: &str) -> DomainResult<Vec<u8>> {
            Ok(vec![0xff, 0xd8])
        }
    }

    struct StubDetector {
        holds: Vec<Hold>,
    }

    #[async_trait]
    impl HoldDetectorPort for StubDetector {
        async fn detect(
            &self,
            _image_bytes: &[u8],
            _target_color: &str,
        ) -> DomainResult<(Vec<Hold>, WallSize)> {
            Ok((
                self.holds.clone(),
                WallSize {
                    width: 100,
                    height: 100,
                },
            ))
        }
    }

    struct StubClassifier {
        class_index: usize,
        invoked: AtomicBool,
    }

    impl StubClassifier {
        fn new(class_index: usize) -> Self {
            Self {
                class_index,
                invoked: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl RouteClassifierPort for StubClassifier {
        async fn classify(&self, graph: &RouteGraph) -> DomainResult<usize> {
            self.invoked.store(true, Ordering::SeqCst);
            assert!(graph.edge_count() > 0, "el guard debe filtrar grafos vacíos");
            Ok(self.class_index)
        }
    }

    fn hold(x: f32, y: f32) -> Hold {
        Hold {
            x,
            y,
            width: 10.0,
            height: 10.0,
            grip: "jug".to_string(),
        }
    }

    fn service(holds: Vec<Hold>, classifier: Arc<StubClassifier>) -> GradingService {
        GradingService::new(
            Arc::new(StubImages),
            Arc::new(StubDetector { holds }),
            classifier,
        )
    }

    #[tokio::test]
    async fn connected_route_gets_a_grade() {
        let classifier = Arc::new(StubClassifier::new(3));
        let svc = service(vec![hold(10.0, 10.0), hold(20.0, 20.0)], classifier.clone());

        let analysis = svc.grade_route("http://wall/foto.jpg", "red").await.unwrap();
        let grade = analysis.grade.expect("debería haber predicción");
        assert_eq!(grade.class_index, 3);
        assert_eq!(grade.label, "V3");
        assert!(classifier.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn single_hold_skips_the_classifier() {
        let classifier = Arc::new(StubClassifier::new(0));
        let svc = service(vec![hold(50.0, 50.0)], classifier.clone());

        let analysis = svc.grade_route("http://wall/foto.jpg", "red").await.unwrap();
        assert!(analysis.grade.is_none());
        assert!(!classifier.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn no_holds_of_target_color_skips_the_classifier() {
        let classifier = Arc::new(StubClassifier::new(0));
        let svc = service(vec![], classifier.clone());

        let analysis = svc.grade_route("http://wall/foto.jpg", "green").await.unwrap();
        assert!(analysis.grade.is_none());
        assert_eq!(analysis.holds.len(), 0);
        assert!(!classifier.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn distant_holds_skip_the_classifier() {
        let classifier = Arc::new(StubClassifier::new(0));
        let svc = service(vec![hold(10.0, 10.0), hold(80.0, 80.0)], classifier.clone());

        let analysis = svc.grade_route("http://wall/foto.jpg", "red").await.unwrap();
        assert!(analysis.grade.is_none());
        assert!(!classifier.invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn detector_failure_propagates() {
        struct FailingDetector;

        #[async_trait]
        impl HoldDetectorPort for FailingDetector {
            async fn detect(
                &self,
                _image_bytes: &[u8],
                _target_color: &str,
            ) -> DomainResult<(Vec<Hold>, WallSize)> {
                Err(DomainError::OperationFailed("sesión caída".into()))
            }
        }

        let svc = GradingService::new(
            Arc::new(StubImages),
            Arc::new(FailingDetector),
            Arc::new(StubClassifier::new(0)),
        );
        let err = svc.grade_route("http://wall/foto.jpg", "red").await;
        assert!(matches!(err, Err(DomainError::OperationFailed(_))));
    }
}
