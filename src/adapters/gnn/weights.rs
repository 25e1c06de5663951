use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::model::GnnDims;

/// Volcado JSON de los pesos entrenados del clasificador, exportado desde
/// el state_dict original. Cada capa trae su matriz en convención torch:
/// filas = dimensión de salida.
#[derive(Debug, Deserialize)]
struct WeightsFile {
    conv1: LayerFile,
    conv2: LayerFile,
    fc: LayerFile,
}

#[derive(Debug, Deserialize)]
struct LayerFile {
    weight: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LayerFile {
    /// Valida las formas y devuelve la matriz ya traspuesta a
    /// (entrada × salida), lista para `x.dot(w)`.
    fn into_arrays(self, in_dim: usize, out_dim: usize, name: &str) -> Result<(Array2<f32>, Array1<f32>)> {
        if self.weight.len() != out_dim {
            bail!(
                "capa {name}: se esperaban {out_dim} filas de pesos, hay {}",
                self.weight.len()
            );
        }
        let mut flat = Vec::with_capacity(out_dim * in_dim);
        for row in &self.weight {
            if row.len() != in_dim {
                bail!(
                    "capa {name}: se esperaban filas de {in_dim} valores, hay {}",
                    row.len()
                );
            }
            flat.extend_from_slice(row);
        }
        if self.bias.len() != out_dim {
            bail!(
                "capa {name}: se esperaba un bias de {out_dim} valores, hay {}",
                self.bias.len()
            );
        }

        let weight = Array2::from_shape_vec((out_dim, in_dim), flat)
            .with_context(|| format!("capa {name}: forma de pesos inválida"))?
            .reversed_axes();
        Ok((weight, Array1::from_vec(self.bias)))
    }
}

/// Pesos inmutables del clasificador, ya en matrices orientadas para el
/// paso forward. Se cargan una vez al arranque y se comparten en sólo
/// lectura entre peticiones.
#[derive(Debug, Clone)]
pub struct GnnWeights {
    pub dims: GnnDims,
    pub w1: Array2<f32>,
    pub b1: Array1<f32>,
    pub w2: Array2<f32>,
    pub b2: Array1<f32>,
    pub w_fc: Array2<f32>,
    pub b_fc: Array1<f32>,
}

impl GnnWeights {
    pub fn from_json(json: &str, dims: GnnDims) -> Result<Self> {
        let file: WeightsFile =
            serde_json::from_str(json).context("fichero de pesos GNN ilegible")?;

        let (w1, b1) = file.conv1.into_arrays(dims.input_dim, dims.hidden_dim, "conv1")?;
        let (w2, b2) = file.conv2.into_arrays(dims.hidden_dim, dims.hidden_dim, "conv2")?;
        let (w_fc, b_fc) = file.fc.into_arrays(dims.hidden_dim, dims.num_classes, "fc")?;

        Ok(Self {
            dims,
            w1,
            b1,
            w2,
            b2,
            w_fc,
            b_fc,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P, dims: GnnDims) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("no se pudo leer {}", path.as_ref().display())
        })?;
        Self::from_json(&json, dims)
    }
}
