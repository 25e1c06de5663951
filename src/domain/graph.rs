use ndarray::Array2;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::features::{encode_hold, FEATURE_DIM};
use crate::domain::hold::{Hold, WallSize};

/// Umbral de proximidad: dos presas quedan conectadas si su distancia
/// euclídea, normalizada por el ancho del muro, cae por debajo.
pub const ADJACENCY_THRESHOLD: f32 = 0.25;

/// Grafo de ruta listo para el clasificador: matriz de características,
/// aristas en convención edge_index (dos vectores paralelos con pares
/// dirigidos duplicados) y etiqueta de batch por nodo.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    /// Características por nodo, filas = presas en orden de detección.
    pub x: Array2<f32>,
    pub edge_src: Vec<usize>,
    pub edge_dst: Vec<usize>,
    /// Una imagen por petición: todos los nodos pertenecen al grafo 0.
    pub batch: Vec<usize>,
}

impl RouteGraph {
    pub fn node_count(&self) -> usize {
        self.x.nrows()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_src.len()
    }
}

/// Evalúa cada par ordenado (i, j), i ≠ j; un par incluido en una
/// dirección lo está también en la otra, como espera la convolución.
/// O(n²) sobre decenas de presas por imagen.
fn build_edges(holds: &[Hold], wall: WallSize) -> (Vec<usize>, Vec<usize>) {
    let wall_w = wall.width as f32;
    let mut edge_src = Vec::new();
    let mut edge_dst = Vec::new();

    for i in 0..holds.len() {
        for j in 0..holds.len() {
            if i == j {
                continue;
            }
            let dx = holds[i].x - holds[j].x;
            let dy = holds[i].y - holds[j].y;
            let dist = (dx * dx + dy * dy).sqrt();
            // La distancia se normaliza por el ancho del muro también en
            // vertical: convención con la que se entrenó el modelo.
            if dist / wall_w < ADJACENCY_THRESHOLD {
                edge_src.push(i);
                edge_dst.push(j);
            }
        }
    }
    (edge_src, edge_dst)
}

/// Construye el grafo de ruta a partir de las presas detectadas.
/// Determinista para una misma entrada. Un muro con dimensión cero es un
/// fallo de validación del llamante, no un caso degradado.
pub fn build_graph(holds: &[Hold], wall: WallSize) -> DomainResult<RouteGraph> {
    if wall.width == 0 || wall.height == 0 {
        return Err(DomainError::InvalidInput(format!(
            "dimensiones de muro no válidas: {}x{}",
            wall.width, wall.height
        )));
    }

    let mut flat = Vec::with_capacity(holds.len() * FEATURE_DIM);
    for hold in holds {
        flat.extend_from_slice(&encode_hold(hold, wall));
    }
    let x = Array2::from_shape_vec((holds.len(), FEATURE_DIM), flat)
        .map_err(|e| DomainError::OperationFailed(format!("matriz de características: {e}")))?;

    let (edge_src, edge_dst) = build_edges(holds, wall);

    Ok(RouteGraph {
        x,
        edge_src,
        edge_dst,
        batch: vec![0; holds.len()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(x: f32, y: f32) -> Hold {
        Hold {
            x,
            y,
            width: 10.0,
            height: 10.0,
            grip: "jug".to_string(),
        }
    }

    const WALL: WallSize = WallSize {
        width: 100,
        height: 100,
    };

    fn edges(graph: &RouteGraph) -> Vec<(usize, usize)> {
        graph
            .edge_src
            .iter()
            .copied()
            .zip(graph.edge_dst.iter().copied())
            .collect()
    }

    #[test]
    fn close_holds_get_both_directed_edges() {
        // distancia √200/100 ≈ 0.1414 < 0.25
        let graph = build_graph(&[hold(10.0, 10.0), hold(20.0, 20.0)], WALL).unwrap();
        assert_eq!(edges(&graph), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn distant_holds_are_not_connected() {
        // distancia ≈ 0.9899 ≥ 0.25
        let graph = build_graph(&[hold(10.0, 10.0), hold(80.0, 80.0)], WALL).unwrap();
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn adjacency_is_symmetric_and_loop_free() {
        let holds = vec![
            hold(10.0, 10.0),
            hold(25.0, 18.0),
            hold(90.0, 90.0),
            hold(30.0, 30.0),
        ];
        let graph = build_graph(&holds, WALL).unwrap();
        let pairs = edges(&graph);
        for &(i, j) in &pairs {
            assert_ne!(i, j);
            assert!(i < holds.len() && j < holds.len());
            assert!(pairs.contains(&(j, i)));
        }
    }

    #[test]
    fn empty_route_yields_empty_graph() {
        let graph = build_graph(&[], WALL).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn single_hold_yields_no_edges() {
        let graph = build_graph(&[hold(50.0, 50.0)], WALL).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn zero_wall_dimension_is_rejected() {
        let degenerate = WallSize {
            width: 0,
            height: 100,
        };
        match build_graph(&[hold(1.0, 1.0)], degenerate) {
            Err(DomainError::InvalidInput(_)) => {}
            other => panic!("se esperaba InvalidInput, llegó {other:?}"),
        }
    }

    #[test]
    fn all_nodes_share_batch_zero() {
        let graph = build_graph(&[hold(10.0, 10.0), hold(20.0, 20.0)], WALL).unwrap();
        assert_eq!(graph.batch, vec![0, 0]);
        assert_eq!(graph.x.ncols(), FEATURE_DIM);
    }
}
