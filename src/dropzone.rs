//! Upload drop layer state
//!
//! Drag events fire once per element crossed, so entering a child element
//! produces an extra enter/leave pair. A counter rather than a flag tells
//! whether a drag is still over the window.

/// Opacity of the listing while a drag hovers the window
pub const DRAG_OPACITY: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    counter: u32,
    enabled: bool,
}

impl Default for DropZone {
    fn default() -> Self {
        Self {
            counter: 0,
            enabled: true,
        }
    }
}

impl DropZone {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn drag_enter(&mut self) {
        if self.enabled {
            self.counter += 1;
        }
    }

    pub const fn drag_leave(&mut self) {
        if self.enabled {
            self.counter = self.counter.saturating_sub(1);
        }
    }

    pub const fn drop_files(&mut self) {
        if self.enabled {
            self.counter = 0;
        }
    }

    /// Disabled while a modal editor owns drag-and-drop
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.counter = 0;
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.counter > 0
    }

    /// Opacity for the file listing underneath the drop layer
    #[must_use]
    pub const fn opacity(&self) -> f32 {
        if self.is_active() { DRAG_OPACITY } else { 1.0 }
    }
}
