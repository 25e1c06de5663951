use anyhow::{anyhow, Result};
use async_trait::async_trait;
use image::{imageops::FilterType, RgbImage};
use ndarray::{s, Array4, ArrayViewD, Axis, IxDyn};
use ort::session::Session;
use ort::value::Value;
use std::fs;
use std::sync::Mutex;

use crate::application::ports::HoldDetectorPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::hold::{Hold, WallSize, GRIP_TYPES};
use crate::domain::model::DetectorParams;

/// Clases del modelo de color, en el orden de entrenamiento.
const HOLD_COLORS: [&str; 9] = [
    "black", "blue", "green", "orange", "pink", "purple", "red", "white", "yellow",
];

/// Caja cruda decodificada de la salida YOLO, en píxeles de la imagen
/// original.
struct RawDetection {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    score: f32,
    class_id: usize,
}

/// Detector de presas en dos pasadas: el modelo de color localiza las
/// presas sobre la imagen completa y el modelo de agarre clasifica el
/// recorte de cada una. Las sesiones se cargan una vez y se comparten en
/// sólo lectura; el Mutex existe porque `ort` exige `&mut` para ejecutar.
pub struct OnnxHoldDetector {
    color_session: Mutex<Session>,
    type_session: Mutex<Session>,
    params: DetectorParams,
}

impl OnnxHoldDetector {
    pub fn load(color_path: &str, type_path: &str, params: DetectorParams) -> Result<Self> {
        Ok(Self {
            color_session: Mutex::new(Self::build_session(color_path)?),
            type_session: Mutex::new(Self::build_session(type_path)?),
            params,
        })
    }

    fn build_session(path: &str) -> Result<Session> {
        // Inferencia en CPU, igual que el despliegue original.
        let mut builder = Session::builder()?
            .with_intra_threads(4)
            .map_err(ort::Error::<()>::from)?;

        // Con `ort` sin default-features usamos commit_from_memory.
        let model_bytes = fs::read(path)?;
        Ok(builder.commit_from_memory(&model_bytes)?)
    }

    fn detect_blocking(&self, image_bytes: &[u8], target_color: &str) -> Result<(Vec<Hold>, WallSize)> {
        let rgb = image::load_from_memory(image_bytes)?.to_rgb8();
        let wall = WallSize {
            width: rgb.width(),
            height: rgb.height(),
        };

        let color_detections = {
            let mut session = self
                .color_session
                .lock()
                .map_err(|_| anyhow!("sesión de color envenenada"))?;
            infer(&mut session, &rgb, &self.params)?
        };

        let mut holds = Vec::new();
        for det in color_detections {
            let Some(&color) = HOLD_COLORS.get(det.class_id) else {
                continue;
            };
            if color != target_color {
                continue;
            }

            // Recorte de la caja acotado a los límites de la imagen.
            let x1 = det.x1.max(0.0).min(wall.width as f32);
            let y1 = det.y1.max(0.0).min(wall.height as f32);
            let x2 = det.x2.max(0.0).min(wall.width as f32);
            let y2 = det.y2.max(0.0).min(wall.height as f32);
            if x2 <= x1 + 1.0 || y2 <= y1 + 1.0 {
                continue;
            }

            let crop = image::imageops::crop_imm(
                &rgb,
                x1 as u32,
                y1 as u32,
                (x2 - x1) as u32,
                (y2 - y1) as u32,
            )
            .to_image();
            let grip = self.classify_grip(&crop)?;

            holds.push(Hold {
                x: (x1 + x2) / 2.0,
                y: (y1 + y2) / 2.0,
                width: x2 - x1,
                height: y2 - y1,
                grip,
            });
        }

        Ok((holds, wall))
    }

    /// Clasifica el recorte de una presa. Si el modelo de agarre no
    /// detecta nada, la presa queda como "unknown" y el encoder la
    /// codificará sin señal categórica.
    fn classify_grip(&self, crop: &RgbImage) -> Result<String> {
        let detections = {
            let mut session = self
                .type_session
                .lock()
                .map_err(|_| anyhow!("sesión de agarre envenenada"))?;
            infer(&mut session, crop, &self.params)?
        };

        let label = detections
            .first()
            .and_then(|det| GRIP_TYPES.get(det.class_id).copied())
            .unwrap_or("unknown");
        Ok(label.to_lowercase())
    }
}

/// Pasada YOLO estándar: entrada CHW 1×3×S×S en [0,1], salida
/// [1, 4+clases, candidatos] con cajas centro/tamaño en coordenadas del
/// lienzo reescalado.
fn infer(session: &mut Session, rgb: &RgbImage, params: &DetectorParams) -> Result<Vec<RawDetection>> {
    let imgsz = params.input_size as usize;
    let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Nearest);

    let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
    for (x, y, pixel) in resized.enumerate_pixels() {
        input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
        input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
        input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
    }

    let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
    let input_tensor = Value::from_array((input_shape, input.into_raw_vec()))?;

    let outputs = session.run(ort::inputs![input_tensor])?;
    let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

    let dims: Vec<usize> = shape_out.into_iter().map(|&x| x as usize).collect();
    let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
    let view = array_view.index_axis(Axis(0), 0);

    let num_candidates = view.shape()[1];
    let sx = rgb.width() as f32 / imgsz as f32;
    let sy = rgb.height() as f32 / imgsz as f32;

    let mut detections = Vec::new();

    for i in 0..num_candidates {
        let scores = view.slice(s![4.., i]);
        let (class_id, &max_score) = scores
            .indexed_iter()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        if max_score > params.conf_threshold {
            let cx = view[[0, i]];
            let cy = view[[1, i]];
            let w = view[[2, i]];
            let h = view[[3, i]];

            detections.push(RawDetection {
                x1: (cx - w / 2.0) * sx,
                y1: (cy - h / 2.0) * sy,
                x2: (cx + w / 2.0) * sx,
                y2: (cy + h / 2.0) * sy,
                score: max_score,
                class_id,
            });
        }
    }

    detections.sort_unstable_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
    detections.truncate(params.max_detections);
    Ok(detections)
}

#[async_trait]
impl HoldDetectorPort for OnnxHoldDetector {
    async fn detect(
        &self,
        image_bytes: &[u8],
        target_color: &str,
    ) -> DomainResult<(Vec<Hold>, WallSize)> {
        tokio::task::block_in_place(|| self.detect_blocking(image_bytes, target_color))
            .map_err(|e| DomainError::OperationFailed(format!("detección de presas: {e:#}")))
    }
}
