use crate::config::ZoomConfig;

/// Page zoom factor, clamped to the configured range.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomLevel {
    factor: f64,
    config: ZoomConfig,
}

impl ZoomLevel {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            factor: 1.0,
            config,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set(self.factor + self.config.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set(self.factor - self.config.step)
    }

    pub fn reset(&mut self) -> f64 {
        self.set(1.0)
    }

    fn set(&mut self, factor: f64) -> f64 {
        // Round to two decimals so repeated steps do not drift.
        let rounded = (factor * 100.0).round() / 100.0;
        self.factor = rounded.clamp(self.config.min, self.config.max);
        self.factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_and_reset() {
        let mut zoom = ZoomLevel::new(ZoomConfig::default());
        assert_eq!(zoom.zoom_in(), 1.1);
        assert_eq!(zoom.zoom_in(), 1.2);
        assert_eq!(zoom.zoom_out(), 1.1);
        assert_eq!(zoom.reset(), 1.0);
    }

    #[test]
    fn test_clamped_to_range() {
        let mut zoom = ZoomLevel::new(ZoomConfig::default());
        for _ in 0..100 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.factor(), 0.25);
        for _ in 0..100 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.factor(), 5.0);
    }
}
