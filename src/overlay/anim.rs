use eframe::egui::Pos2;

/// Quadratic ease-in-out weight. Exact at the endpoints and at the midpoint:
/// `w(0) = 0`, `w(0.5) = 0.5`, `w(1) = 1`.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// One taxi hop, interpolated in screen space between the positions mapped
/// at the moment the position change arrived. A new session always replaces
/// any active one; there is no queue of pending hops. The driver samples it
/// per frame and drops it once finished.
#[derive(Clone, Copy, Debug)]
pub struct AnimSession {
    pub from: Pos2,
    pub to: Pos2,
    pub start_time: f64,
    pub duration_secs: f32,
}

impl AnimSession {
    pub fn new(from: Pos2, to: Pos2, start_time: f64, duration_secs: f32) -> Self {
        Self {
            from,
            to,
            start_time,
            duration_secs: duration_secs.max(1e-3),
        }
    }

    pub fn progress(&self, now: f64) -> f32 {
        (((now - self.start_time) / self.duration_secs as f64).clamp(0.0, 1.0)) as f32
    }

    /// Interpolated position; lands exactly on `to` at the end regardless of
    /// float rounding in the lerp.
    pub fn sample(&self, now: f64) -> Pos2 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * ease_in_out(t)
    }

    pub fn finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn weight_is_exact_at_key_points() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(0.5), 0.5);
        assert_eq!(ease_in_out(1.0), 1.0);
    }

    #[test]
    fn weight_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let w = ease_in_out(i as f32 / 100.0);
            assert!(w >= last);
            last = w;
        }
    }

    #[test]
    fn session_lands_exactly_on_target() {
        for duration in [0.05_f32, 0.24, 3.0] {
            let session = AnimSession::new(pos2(10.0, 20.0), pos2(371.3, 42.7), 0.0, duration);
            assert_eq!(session.sample(duration as f64), session.to);
            assert_eq!(session.sample(duration as f64 + 5.0), session.to);
            assert!(session.finished(duration as f64));
        }
    }

    #[test]
    fn session_starts_at_from_and_passes_the_midpoint() {
        let session = AnimSession::new(pos2(0.0, 0.0), pos2(100.0, 0.0), 50.0, 2.0);
        assert_eq!(session.sample(50.0), session.from);
        assert!(!session.finished(50.0));

        let mid = session.sample(51.0);
        assert!((mid.x - 50.0).abs() < 1e-3);
    }

    #[test]
    fn progress_clamps_before_start() {
        let session = AnimSession::new(pos2(0.0, 0.0), pos2(1.0, 1.0), 50.0, 1.0);
        assert_eq!(session.progress(49.0), 0.0);
        assert_eq!(session.sample(49.0), session.from);
    }
}
