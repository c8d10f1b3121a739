// ---------------------------------------------------------------------------
// Critically-damped smoothing (spring-damper, closed form)
// ---------------------------------------------------------------------------

/// Move `current` toward `target` along a critically damped spring.
///
/// `velocity` carries the rate between calls and must persist for the
/// smoothing to be continuous. Uses the polynomial approximation of
/// `exp(-omega * dt)` from Game Programming Gems 4, ch. 1.10, and never
/// overshoots `target`.
pub fn smooth_damp(current: f64, target: f64, velocity: &mut f64, smooth_time: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp at the target instead of passing it.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }
    output
}

/// Signed shortest difference `target - current` in degrees, in [-180, 180).
pub fn delta_angle(current: f64, target: f64) -> f64 {
    let d = (target - current).rem_euclid(360.0);
    if d >= 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// [`smooth_damp`] for angles in degrees, taking the short way around.
pub fn smooth_damp_angle(current: f64, target: f64, velocity: &mut f64, smooth_time: f64, dt: f64) -> f64 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approaches_without_overshoot() {
        let mut v = 0.0;
        let mut x = 10.0;
        let mut prev = x;
        for _ in 0..500 {
            x = smooth_damp(x, 0.0, &mut v, 0.2, 0.02);
            assert!(x >= 0.0, "overshot target: {}", x);
            assert!(x <= prev + 1e-12, "moved away from target");
            prev = x;
        }
        assert!(x < 1e-3, "should settle, got {}", x);
    }

    #[test]
    fn velocity_state_persists() {
        let mut v = 0.0;
        smooth_damp(1.0, 0.0, &mut v, 0.2, 0.02);
        assert!(v < 0.0, "velocity should point toward target");
    }

    #[test]
    fn zero_dt_is_noop() {
        let mut v = 0.5;
        assert_eq!(smooth_damp(3.0, 0.0, &mut v, 0.2, 0.0), 3.0);
        assert_eq!(v, 0.5);
    }

    #[test]
    fn delta_angle_wraps() {
        assert!((delta_angle(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((delta_angle(10.0, 350.0) + 20.0).abs() < 1e-12);
        assert!((delta_angle(45.0, 0.0) + 45.0).abs() < 1e-12);
    }

    #[test]
    fn angle_takes_short_way() {
        let mut v = 0.0;
        let out = smooth_damp_angle(350.0, 10.0, &mut v, 0.2, 0.02);
        assert!(out > 350.0, "should move up through 360, got {}", out);
    }
}
