/// Elapsed-time clock fed with millisecond timestamps (`performance.now()`).
///
/// The first sample starts the clock.
#[derive(Debug, Default, Clone)]
pub struct Clock {
    start_ms: Option<f64>,
    last_ms: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the first sample. Never decreases.
    pub fn elapsed(&mut self, now_ms: f64) -> f32 {
        let start = *self.start_ms.get_or_insert(now_ms);
        self.last_ms = now_ms.max(self.last_ms).max(start);
        ((self.last_ms - start) / 1000.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_zero() {
        let mut clock = Clock::new();
        assert_eq!(clock.elapsed(1234.5), 0.0);
    }

    #[test]
    fn elapsed_is_seconds_since_start() {
        let mut clock = Clock::new();
        clock.elapsed(1000.0);
        assert!((clock.elapsed(1500.0) - 0.5).abs() < 1e-6);
        assert!((clock.elapsed(3000.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn never_runs_backwards() {
        let mut clock = Clock::new();
        clock.elapsed(500.0);
        let t = clock.elapsed(900.0);
        assert_eq!(clock.elapsed(700.0), t);
        assert_eq!(clock.elapsed(100.0), t);
    }
}
