// Panel geometry and bring-up timing.
//
// Defaults match a 2.4"/2.8" ILI9341 module in portrait (MADCTL 0x48).

/// Panel width in pixels for the default portrait orientation.
pub const LCD_WIDTH: u16 = 240;
/// Panel height in pixels for the default portrait orientation.
pub const LCD_HEIGHT: u16 = 320;

/// Settle delays used by `reset()` and `initialize()`, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// RST held low.
    pub reset_low_ms: u32,
    /// After RST is released.
    pub reset_high_ms: u32,
    /// After the 0x01 software reset.
    pub sw_reset_ms: u32,
    /// After 0x11 sleep out, before display on.
    pub sleep_out_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reset_low_ms: 200,
            reset_high_ms: 200,
            sw_reset_ms: 1000,
            sleep_out_ms: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub width: u16,
    pub height: u16,
    pub timing: Timing,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: LCD_WIDTH,
            height: LCD_HEIGHT,
            timing: Timing::default(),
        }
    }
}

impl PanelConfig {
    // Builder-style overrides, handy for panels wired in landscape.
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_portrait_ili9341() {
        let cfg = PanelConfig::default();
        assert_eq!((cfg.width, cfg.height), (240, 320));
        assert_eq!(cfg.timing.sw_reset_ms, 1000);
        assert_eq!(cfg.timing.sleep_out_ms, 120);
    }

    #[test]
    fn overrides_keep_other_fields() {
        let fast = Timing { reset_low_ms: 1, reset_high_ms: 1, sw_reset_ms: 5, sleep_out_ms: 5 };
        let cfg = PanelConfig::default().with_size(320, 240).with_timing(fast);
        assert_eq!((cfg.width, cfg.height), (320, 240));
        assert_eq!(cfg.timing, fast);
    }
}
