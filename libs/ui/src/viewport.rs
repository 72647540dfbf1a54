use serde::{Deserialize, Serialize};

/// Widest viewport, in logical pixels, that still gets the hamburger and
/// accordion behavior.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportMode {
    Mobile,
    Desktop,
}

impl ViewportMode {
    pub fn from_width(width_px: u32) -> Self {
        Self::with_breakpoint(width_px, MOBILE_BREAKPOINT_PX)
    }

    /// The breakpoint itself counts as mobile.
    pub fn with_breakpoint(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px <= breakpoint_px {
            ViewportMode::Mobile
        } else {
            ViewportMode::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        matches!(self, ViewportMode::Mobile)
    }
}
