use crate::domain::hold::{lookup_grip, Hold, WallSize, GRIP_TYPES};

/// Dimensión del vector de características por presa:
/// [x, y, área] normalizados + one-hot del tipo de agarre.
pub const FEATURE_DIM: usize = 3 + GRIP_TYPES.len();

/// Reescala un valor en píxeles a unidades relativas al muro.
/// Precondición: `reference > 0` (garantizada por `build_graph`).
pub fn normalize(value: f32, reference: f32) -> f32 {
    value / reference
}

/// Codifica una presa como vector de características independiente de la
/// resolución de la imagen: la misma ruta fotografiada a otra escala
/// produce el mismo encoding.
pub fn encode_hold(hold: &Hold, wall: WallSize) -> [f32; FEATURE_DIM] {
    let wall_w = wall.width as f32;
    let wall_h = wall.height as f32;

    let mut features = [0.0; FEATURE_DIM];
    features[0] = normalize(hold.x, wall_w);
    features[1] = normalize(hold.y, wall_h);
    features[2] = normalize(hold.width * hold.height, wall_w * wall_h);
    features[3..].copy_from_slice(&lookup_grip(&hold.grip).one_hot());
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(x: f32, y: f32, grip: &str) -> Hold {
        Hold {
            x,
            y,
            width: 20.0,
            height: 10.0,
            grip: grip.to_string(),
        }
    }

    const WALL: WallSize = WallSize {
        width: 200,
        height: 100,
    };

    #[test]
    fn geometry_is_normalized_to_unit_range() {
        let features = encode_hold(&hold(50.0, 25.0, "jug"), WALL);
        assert_eq!(features[0], 0.25);
        assert_eq!(features[1], 0.25);
        assert_eq!(features[2], 0.01); // 200 px² / 20000 px²
    }

    #[test]
    fn in_bounds_holds_stay_in_unit_range() {
        for (x, y) in [(0.0, 0.0), (200.0, 100.0), (113.0, 77.0)] {
            let features = encode_hold(&hold(x, y, "crimp"), WALL);
            assert!((0.0..=1.0).contains(&features[0]));
            assert!((0.0..=1.0).contains(&features[1]));
            assert!((0.0..=1.0).contains(&features[2]));
        }
    }

    #[test]
    fn known_grip_sets_matching_one_hot_position() {
        for (idx, label) in GRIP_TYPES.iter().enumerate() {
            let features = encode_hold(&hold(10.0, 10.0, label), WALL);
            let one_hot = &features[3..];
            assert_eq!(one_hot.iter().sum::<f32>(), 1.0);
            assert_eq!(one_hot[idx], 1.0);
        }
    }

    #[test]
    fn unknown_grip_contributes_no_categorical_signal() {
        let features = encode_hold(&hold(10.0, 10.0, "unknown"), WALL);
        assert!(features[3..].iter().all(|&v| v == 0.0));
        // la geometría se mantiene
        assert!(features[0] > 0.0 && features[2] > 0.0);
    }

    #[test]
    fn feature_vector_has_fixed_length() {
        assert_eq!(FEATURE_DIM, 8);
        assert_eq!(encode_hold(&hold(1.0, 1.0, "edge"), WALL).len(), 8);
    }
}
