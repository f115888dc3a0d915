//! Input collaborator consumed by cursor focuses and scroll zoom.

use std::collections::HashMap;

use eyeframe_scene_model::geometry::Point2D;

/// Per-frame input values supplied by the host.
pub trait InputSource {
    /// Current value of a named axis (scroll delta, mouse delta). Unknown
    /// axes read as `0.0`.
    fn axis(&self, name: &str) -> f64;

    /// Cursor position in viewport space, `(0, 0)` bottom-left to `(1, 1)`
    /// top-right. `None` when no cursor is available.
    fn cursor_viewport(&self) -> Option<Point2D>;
}

/// Input snapshot holding fixed values, for simulation and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticInput {
    axes: HashMap<String, f64>,
    cursor: Option<Point2D>,
}

impl StaticInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set_axis(name, value);
        self
    }

    pub fn with_cursor(mut self, cursor: Point2D) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn set_axis(&mut self, name: impl Into<String>, value: f64) {
        self.axes.insert(name.into(), value);
    }

    pub fn set_cursor(&mut self, cursor: Option<Point2D>) {
        self.cursor = cursor;
    }
}

impl InputSource for StaticInput {
    fn axis(&self, name: &str) -> f64 {
        self.axes.get(name).copied().unwrap_or(0.0)
    }

    fn cursor_viewport(&self) -> Option<Point2D> {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_axis_reads_zero() {
        let input = StaticInput::new().with_axis("scroll", 1.5);
        assert_eq!(input.axis("scroll"), 1.5);
        assert_eq!(input.axis("missing"), 0.0);
        assert!(input.cursor_viewport().is_none());
    }
}
