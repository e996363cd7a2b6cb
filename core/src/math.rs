//! Small numeric helpers for frame-based code

/// Round `value` to the nearest multiple of `multiple`, ties to even.
///
/// A zero multiple returns `value` unchanged.
pub fn round_to_nearest_multiple(value: f32, multiple: f32) -> f32 {
    if multiple == 0.0 {
        return value;
    }
    (value / multiple).round_ties_even() * multiple
}

/// Integer variant of [`round_to_nearest_multiple`]
pub fn round_to_nearest_multiple_i32(value: i32, multiple: i32) -> i32 {
    if multiple == 0 {
        return value;
    }
    (value as f32 / multiple as f32).round_ties_even() as i32 * multiple
}

/// Frame-rate independent exponential smoothing toward `target`.
///
/// `factor` is the damping rate per second (typically 5-10).
pub fn damp(current: f32, target: f32, factor: f32, dt: f32) -> f32 {
    let t = 1.0 - (-factor * dt).exp();
    current + (target - current) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_multiple_returns_input() {
        assert_eq!(round_to_nearest_multiple(3.7, 0.0), 3.7);
        assert_eq!(round_to_nearest_multiple_i32(13, 0), 13);
    }

    #[test]
    fn rounds_to_multiple() {
        assert_eq!(round_to_nearest_multiple(7.0, 5.0), 5.0);
        assert_eq!(round_to_nearest_multiple(8.0, 5.0), 10.0);
        assert_eq!(round_to_nearest_multiple_i32(17, 5), 15);
        assert_eq!(round_to_nearest_multiple_i32(-8, 5), -10);
    }

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_to_nearest_multiple(2.5, 1.0), 2.0);
        assert_eq!(round_to_nearest_multiple(3.5, 1.0), 4.0);
        assert_eq!(round_to_nearest_multiple_i32(15, 10), 20);
        assert_eq!(round_to_nearest_multiple_i32(25, 10), 20);
    }

    #[test]
    fn damp_moves_toward_target() {
        assert_eq!(damp(0.0, 10.0, 5.0, 0.0), 0.0);
        let step = damp(0.0, 10.0, 5.0, 0.1);
        assert!(step > 0.0 && step < 10.0);
        assert!((damp(0.0, 10.0, 5.0, 100.0) - 10.0).abs() < 1e-4);
    }
}
