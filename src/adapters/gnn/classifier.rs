use anyhow::Result;
use async_trait::async_trait;
use ndarray::{Array1, Array2};
use std::path::Path;

use crate::adapters::gnn::weights::GnnWeights;
use crate::application::ports::RouteClassifierPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::graph::RouteGraph;
use crate::domain::model::GnnDims;

/// Clasificador de grado: dos capas de convolución de grafo con ReLU,
/// pooling medio global y cabeza lineal. Evaluación pura, sin estado
/// mutable, determinista para un grafo y unos pesos fijos.
pub struct GcnClassifier {
    weights: GnnWeights,
}

impl GcnClassifier {
    pub fn new(weights: GnnWeights) -> Self {
        Self { weights }
    }

    pub fn load<P: AsRef<Path>>(path: P, dims: GnnDims) -> Result<Self> {
        Ok(Self::new(GnnWeights::load(path, dims)?))
    }

    /// Â = D̂^(-1/2) (A + I) D̂^(-1/2), construida a partir de edge_index.
    /// Los pares dirigidos duplicados del grafo producen la matriz
    /// simétrica que espera la convolución.
    fn normalized_adjacency(&self, graph: &RouteGraph) -> Array2<f32> {
        let n = graph.node_count();
        let mut adj = Array2::<f32>::eye(n);
        for (&src, &dst) in graph.edge_src.iter().zip(&graph.edge_dst) {
            adj[[dst, src]] = 1.0;
        }

        let degrees: Vec<f32> = (0..n).map(|i| adj.row(i).sum()).collect();
        for i in 0..n {
            for j in 0..n {
                if adj[[i, j]] != 0.0 {
                    adj[[i, j]] /= (degrees[i] * degrees[j]).sqrt();
                }
            }
        }
        adj
    }

    /// Paso forward completo en modo evaluación. Devuelve los logits por
    /// grafo del batch (una fila por grafo).
    pub fn forward(&self, graph: &RouteGraph) -> DomainResult<Array2<f32>> {
        if graph.node_count() == 0 {
            return Err(DomainError::InsufficientGraph("grafo sin nodos".into()));
        }
        if graph.edge_count() == 0 {
            return Err(DomainError::InsufficientGraph("grafo sin aristas".into()));
        }
        if graph.x.ncols() != self.weights.dims.input_dim {
            return Err(DomainError::InvalidInput(format!(
                "el grafo trae {} características por nodo, el modelo espera {}",
                graph.x.ncols(),
                self.weights.dims.input_dim
            )));
        }

        let adj = self.normalized_adjacency(graph);

        let mut hidden = adj.dot(&graph.x).dot(&self.weights.w1);
        hidden += &self.weights.b1;
        relu_inplace(&mut hidden);

        let mut hidden = adj.dot(&hidden).dot(&self.weights.w2);
        hidden += &self.weights.b2;
        relu_inplace(&mut hidden);

        let pooled = global_mean_pool(&hidden, &graph.batch);

        let mut logits = pooled.dot(&self.weights.w_fc);
        logits += &self.weights.b_fc;
        Ok(logits)
    }
}

fn relu_inplace(a: &mut Array2<f32>) {
    a.mapv_inplace(|v| v.max(0.0));
}

/// Media de las representaciones de nodo agrupada por etiqueta de batch.
fn global_mean_pool(hidden: &Array2<f32>, batch: &[usize]) -> Array2<f32> {
    let num_graphs = batch.iter().copied().max().map_or(0, |m| m + 1);
    let mut pooled = Array2::<f32>::zeros((num_graphs, hidden.ncols()));
    let mut counts = vec![0.0f32; num_graphs];

    for (row, &graph_id) in batch.iter().enumerate() {
        counts[graph_id] += 1.0;
        pooled
            .row_mut(graph_id)
            .zip_mut_with(&hidden.row(row), |p, &v| *p += v);
    }
    for (graph_id, mut row) in pooled.rows_mut().into_iter().enumerate() {
        let count = counts[graph_id].max(1.0);
        row.mapv_inplace(|v| v / count);
    }
    pooled
}

fn argmax(logits: &Array1<f32>) -> usize {
    logits
        .indexed_iter()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

#[async_trait]
impl RouteClassifierPort for GcnClassifier {
    async fn classify(&self, graph: &RouteGraph) -> DomainResult<usize> {
        let logits = self.forward(graph)?;
        Ok(argmax(&logits.row(0).to_owned()))
    }
}
