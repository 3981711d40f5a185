pub struct AngleHelper;

impl AngleHelper {
    /// Direction of the horizontal vector `(dx, dy)` in degrees, in (-180, 180].
    pub fn heading(dx: f64, dy: f64) -> f64 {
        dy.atan2(dx).to_degrees()
    }

    /// Wraps an angular difference into [-180, 180).
    pub fn wrap(delta: f64) -> f64 {
        (delta + 180.0).rem_euclid(360.0) - 180.0
    }

    /// Limits `delta` to `[-limit, limit]`.
    pub fn clamp_step(delta: f64, limit: f64) -> f64 {
        let limit = limit.abs();
        delta.max(-limit).min(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_folds_large_differences() {
        assert!((AngleHelper::wrap(340.0) - (-20.0)).abs() < 1e-9);
        assert!((AngleHelper::wrap(-340.0) - 20.0).abs() < 1e-9);
        assert!((AngleHelper::wrap(725.0) - 5.0).abs() < 1e-9);
        assert_eq!(AngleHelper::wrap(180.0), -180.0);
        assert_eq!(AngleHelper::wrap(0.0), 0.0);
    }

    #[test]
    fn clamp_step_is_symmetric() {
        assert_eq!(AngleHelper::clamp_step(20.0, 3.6), 3.6);
        assert_eq!(AngleHelper::clamp_step(-20.0, 3.6), -3.6);
        assert_eq!(AngleHelper::clamp_step(1.5, 3.6), 1.5);
    }

    #[test]
    fn heading_follows_atan2_quadrants() {
        assert_eq!(AngleHelper::heading(1.0, 0.0), 0.0);
        assert!((AngleHelper::heading(0.0, 1.0) - 90.0).abs() < 1e-12);
        assert!((AngleHelper::heading(-1.0, 0.0) - 180.0).abs() < 1e-12);
        assert!((AngleHelper::heading(0.0, -1.0) + 90.0).abs() < 1e-12);
    }
}
