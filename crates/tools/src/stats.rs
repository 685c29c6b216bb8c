/// Rolling frame-time statistics for the diagnostics overlay.
///
/// Fed once per frame after the controller update. The frame rate is
/// recomputed each time a full second of frame time has accumulated.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frames: u64,
    last_ms: f32,
    min_ms: Option<f32>,
    max_ms: f32,
    window_secs: f32,
    window_frames: u32,
    fps: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, delta_secs: f32) {
        let ms = delta_secs * 1000.0;
        self.frames += 1;
        self.last_ms = ms;
        self.min_ms = Some(self.min_ms.map_or(ms, |m| m.min(ms)));
        self.max_ms = self.max_ms.max(ms);

        self.window_secs += delta_secs;
        self.window_frames += 1;
        if self.window_secs >= 1.0 {
            self.fps = self.window_frames as f32 / self.window_secs;
            tracing::trace!(fps = self.fps, max_ms = self.max_ms, "frame window");
            self.window_secs = 0.0;
            self.window_frames = 0;
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames per second over the last completed one-second window.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn last_ms(&self) -> f32 {
        self.last_ms
    }

    pub fn min_ms(&self) -> f32 {
        self.min_ms.unwrap_or(0.0)
    }

    pub fn max_ms(&self) -> f32 {
        self.max_ms
    }
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.0} fps  {:.1} ms ({:.1}-{:.1})",
            self.fps,
            self.last_ms,
            self.min_ms(),
            self.max_ms
        )
    }
}
