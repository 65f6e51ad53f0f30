// ==============================================================================
// input.rs — INPUT MAPPER
// ==============================================================================
// Turns the two raw client axes into pedal pressures:
// - steer clamped to [-1, 1]
// - vertical axis split into non-negative forward and back magnitudes
//
// No smoothing, no deadzone. Whatever filtering the client applies to its
// axes is the only filtering there is.
// ==============================================================================

/// Pedal pressures mapped from the raw axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PedalInput {
    pub steer: f32,    // -1..1
    pub forward: f32,  // 0..1
    pub back: f32,     // 0..1
}

impl PedalInput {
    /// `horizontal` is the steer axis, `vertical` the combined
    /// throttle/brake axis, both nominally in [-1, 1].
    pub fn from_axes(horizontal: f32, vertical: f32) -> Self {
        Self {
            steer: horizontal.clamp(-1.0, 1.0),
            forward: vertical.clamp(0.0, 1.0),
            back: -1.0 * vertical.clamp(-1.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steer_is_clamped() {
        assert_eq!(PedalInput::from_axes(2.5, 0.0).steer, 1.0);
        assert_eq!(PedalInput::from_axes(-2.5, 0.0).steer, -1.0);
        assert_eq!(PedalInput::from_axes(0.3, 0.0).steer, 0.3);
    }

    #[test]
    fn vertical_axis_splits_into_pedals() {
        let fwd = PedalInput::from_axes(0.0, 0.7);
        assert_eq!(fwd.forward, 0.7);
        assert_eq!(fwd.back, 0.0);

        let rev = PedalInput::from_axes(0.0, -0.4);
        assert_eq!(rev.forward, 0.0);
        assert!((rev.back - 0.4).abs() < 1e-6);
    }

    #[test]
    fn pedals_never_negative_even_on_wild_axes() {
        for v in [-10.0, -1.0, -0.001, 0.0, 0.001, 1.0, 10.0] {
            let p = PedalInput::from_axes(0.0, v);
            assert!(p.forward >= 0.0 && p.forward <= 1.0);
            assert!(p.back >= 0.0 && p.back <= 1.0);
        }
    }
}
