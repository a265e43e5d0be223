//! Decay Engine
//!
//! Time-scaled exponential decay of persistent layers.

use crate::error::InfluenceError;
use crate::layer::Layer;

/// Per-call scale factor for a decay rate over `delta_time` seconds.
///
/// `(1 - rate)^dt` composes: two half-steps equal one full step, so the
/// steady state does not depend on frame rate.
pub fn decay_factor(decay_rate: f32, delta_time: f32) -> Result<f32, InfluenceError> {
    if !delta_time.is_finite() || delta_time < 0.0 {
        return Err(InfluenceError::InvalidParameter {
            name: "delta_time",
            value: delta_time,
        });
    }
    let rate = InfluenceError::check_unit("decay", decay_rate)?;
    Ok((1.0 - rate).powf(delta_time))
}

/// Scale every entry by `factor` and prune what falls below `prune_threshold`.
///
/// Returns the number of pruned entries.
pub fn decay_layer(layer: &mut Layer, factor: f32, prune_threshold: f32) -> usize {
    layer.multiply(factor);
    layer.prune(prune_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_graph::VertexId;

    #[test]
    fn test_factor_is_frame_rate_independent() {
        let whole = decay_factor(0.2, 1.0).unwrap();
        let half = decay_factor(0.2, 0.5).unwrap();
        assert!((half * half - whole).abs() < 1e-6);
        assert!((whole - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_delta_is_identity() {
        assert_eq!(decay_factor(0.5, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(decay_factor(0.1, -1.0).is_err());
        assert!(decay_factor(0.1, f32::NAN).is_err());
        assert!(decay_factor(1.5, 1.0).is_err());
    }

    #[test]
    fn test_decay_monotone_and_non_negative() {
        let mut layer = Layer::from([(0, 1.0), (1, 0.5), (2, 0.01)]);
        let factor = decay_factor(0.05, 1.0).unwrap();

        let mut previous = layer.clone();
        for _ in 0..200 {
            decay_layer(&mut layer, factor, 1e-3);
            for (vertex, value) in layer.iter() {
                assert!(value >= 0.0);
                assert!(value <= previous.get(vertex));
            }
            previous = layer.clone();
        }

        // Everything eventually prunes away
        assert!(layer.is_empty());
    }

    #[test]
    fn test_prune_count() {
        let mut layer = Layer::from([(0, 1.0), (1, 0.0015)]);
        let pruned = decay_layer(&mut layer, 0.5, 1e-3);

        assert_eq!(pruned, 1);
        assert!(layer.contains(VertexId(0)));
    }
}
