/// Viewport geometry at the moment of a scroll sample, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
            document_height,
        }
    }

    /// Share of the document seen so far, as a rounded percentage capped at
    /// 100. `None` for an empty document.
    ///
    /// The raw `(scroll_y + viewport_height) / document_height` ratio can pass
    /// 100 on overscroll. Capping means an overscroll from below 100 reports
    /// the 100 checkpoint, where the uncapped value would skip it.
    pub fn depth_percent(&self) -> Option<u32> {
        if self.document_height <= 0.0 {
            return None;
        }
        let pct = ((self.scroll_y + self.viewport_height) / self.document_height * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u32)
    }
}

/// Running maximum scroll depth for one page.
#[derive(Debug, Default)]
pub struct ScrollDepth {
    max_depth: u32,
}

pub const CHECKPOINT_STEP: u32 = 25;

impl ScrollDepth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Record a sample. Returns the new depth when it is a checkpoint
    /// (25, 50, 75, 100) reached for the first time.
    pub fn observe(&mut self, position: ScrollPosition) -> Option<u32> {
        let depth = position.depth_percent()?;
        if depth <= self.max_depth {
            return None;
        }
        self.max_depth = depth;
        (depth % CHECKPOINT_STEP == 0).then_some(depth)
    }
}
