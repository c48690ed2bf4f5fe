//! Inter-tab delay computation

use std::time::Duration;
use tabreload_core::Settings;

/// How long to wait between two tab reloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayPolicy {
    /// Same wait after every tab.
    Fixed(Duration),
    /// `start_ms + unit * end_ms` for a uniform `unit` in `[0, 1)`.
    ///
    /// Not a draw over `[start, end]`: the full `start` offset is always
    /// added to a draw scaled by `end`.
    Randomized { start_ms: u64, end_ms: u64 },
}

impl DelayPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.use_advanced_options {
            Self::Randomized {
                start_ms: settings.advanced_delay_range_start,
                end_ms: settings.advanced_delay_range_end,
            }
        } else {
            Self::Fixed(Duration::from_millis(settings.delay))
        }
    }

    /// Delay for a given uniform sample. `unit` is clamped to `[0, 1)`.
    pub fn delay_for(&self, unit: f64) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Randomized { start_ms, end_ms } => {
                let unit = if unit.is_nan() {
                    0.0
                } else {
                    unit.clamp(0.0, 1.0 - f64::EPSILON)
                };
                let ms = start_ms as f64 + unit * end_ms as f64;
                let micros = (ms * 1000.0) as u64;
                if end_ms == 0 {
                    return Duration::from_micros(micros);
                }
                // f64 rounding can land exactly on the exclusive upper bound
                let upper = start_ms.saturating_add(end_ms).saturating_mul(1000);
                Duration::from_micros(micros.min(upper.saturating_sub(1)))
            }
        }
    }

    /// Delay for the next gap, sampling a fresh random unit.
    pub fn next_delay(&self) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Randomized { .. } => self.delay_for(rand::random::<f64>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advanced(start: u64, end: u64) -> Settings {
        Settings {
            use_advanced_options: true,
            advanced_delay_range_start: start,
            advanced_delay_range_end: end,
            ..Settings::default()
        }
    }

    #[test]
    fn test_fixed_delay() {
        let settings = Settings {
            delay: 250,
            ..Settings::default()
        };
        let policy = DelayPolicy::from_settings(&settings);
        assert_eq!(policy, DelayPolicy::Fixed(Duration::from_millis(250)));
        assert_eq!(policy.delay_for(0.7), Duration::from_millis(250));
        assert_eq!(policy.next_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_advanced_ignores_fixed_delay() {
        let mut settings = advanced(0, 0);
        settings.delay = 900;
        assert_eq!(
            DelayPolicy::from_settings(&settings).next_delay(),
            Duration::ZERO
        );
    }

    #[test]
    fn test_randomized_bounds() {
        let policy = DelayPolicy::from_settings(&advanced(100, 50));
        assert_eq!(policy.delay_for(0.0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(0.5), Duration::from_millis(125));
        assert!(policy.delay_for(0.999_999) < Duration::from_millis(150));
        assert!(policy.delay_for(1.0) < Duration::from_millis(150));
    }

    #[test]
    fn test_randomized_adds_full_start_offset() {
        // start above end: the draw is still start + unit * end
        let policy = DelayPolicy::from_settings(&advanced(500, 100));
        assert_eq!(policy.delay_for(0.5), Duration::from_millis(550));
    }

    #[test]
    fn test_random_samples_stay_in_range() {
        let policy = DelayPolicy::from_settings(&advanced(100, 50));
        for _ in 0..1000 {
            let delay = policy.next_delay();
            assert!(delay >= Duration::from_millis(100), "{delay:?}");
            assert!(delay < Duration::from_millis(150), "{delay:?}");
        }
    }
}
