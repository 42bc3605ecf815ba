use serde::{Deserialize, Serialize};

/// Poll interval bounds for the drag fallback timer, in milliseconds.
const MIN_POLL_INTERVAL_MS: u32 = 20;
const MAX_POLL_INTERVAL_MS: u32 = 50;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Interval of the fallback poll timer that runs while the scaled window
    /// is being dragged or resized.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u32,
    /// Pixel delta applied to the scaled window by the Size+/Size- buttons,
    /// before DPI scaling.
    #[serde(default = "default_resize_step_px")]
    pub resize_step_px: i32,
    /// Initial window size before DPI scaling. If absent, a default is used.
    #[serde(default)]
    pub window_size: Option<(i32, i32)>,
}

fn default_poll_interval_ms() -> u32 {
    20
}

fn default_resize_step_px() -> i32 {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            poll_interval_ms: default_poll_interval_ms(),
            resize_step_px: default_resize_step_px(),
            window_size: Some((400, 300)),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Poll interval clamped to the range the engine's drag reporting was
    /// designed for. Values outside it get a warning and the nearest bound.
    pub fn poll_interval(&self) -> u32 {
        let clamped = self
            .poll_interval_ms
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        if clamped != self.poll_interval_ms {
            tracing::warn!(
                "poll_interval_ms {} is out of range; using {}",
                self.poll_interval_ms,
                clamped
            );
        }
        clamped
    }

    pub fn window_size(&self) -> (i32, i32) {
        self.window_size.unwrap_or((400, 300))
    }
}
