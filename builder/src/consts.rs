//! Shared constants for the builder crate.

// ── Drag and drop ───────────────────────────────────────────────

/// Pointer movement in screen pixels before a pressed source becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

// ── Rendering ───────────────────────────────────────────────────

/// Image source used when an image instance has no `src` configured.
pub const PLACEHOLDER_IMAGE_SRC: &str = "https://via.placeholder.com/300x200";
