//! Screen ⇄ canvas affine transform.
//!
//! `to_canvas(s) = (s - offset) / zoom` and `to_screen(c) = c * zoom + offset`.
//! Every coordinate-consuming operation (drop placement, connector
//! positions, the preview line endpoint) goes through these two functions,
//! and the renderer applies the same transform to the 2D context.

use crate::constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::models::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    offset: Point,
    zoom: f64,
    limits: ZoomLimits,
}

impl Default for CanvasViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasViewport {
    pub fn new() -> Self {
        Self::with_limits(ZoomLimits::default())
    }

    /// Caller guarantees `0 < limits.min <= limits.max` (see
    /// `EditorConfig::validate`).
    pub fn with_limits(limits: ZoomLimits) -> Self {
        Self {
            offset: Point::ORIGIN,
            zoom: limits.clamp(1.0),
            limits,
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn to_canvas(&self, screen: Point) -> Point {
        (screen - self.offset) / self.zoom
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        canvas * self.zoom + self.offset
    }

    /// Translate by a screen-space delta. Not divided by zoom: dragging the
    /// background moves content exactly as far as the pointer moved.
    pub fn pan(&mut self, delta_screen: Point) {
        if delta_screen.is_finite() {
            self.offset = self.offset + delta_screen;
        }
    }

    /// Multiply zoom by `factor` and clamp to the limits.
    ///
    /// With no anchor the scale is about the canvas origin, so the content
    /// under the cursor drifts. With `Some(anchor)` (screen space) the canvas
    /// point under the anchor stays put. Returns whether the zoom changed.
    pub fn zoom_by(&mut self, factor: f64, anchor: Option<Point>) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let new_zoom = self.limits.clamp(self.zoom * factor);
        if new_zoom == self.zoom {
            return false;
        }
        match anchor {
            Some(anchor) if anchor.is_finite() => {
                let pinned = self.to_canvas(anchor);
                self.zoom = new_zoom;
                self.offset = anchor - pinned * new_zoom;
            }
            _ => self.zoom = new_zoom,
        }
        true
    }

    /// Back to origin at 100 % (clamped into the limits).
    pub fn reset(&mut self) {
        self.offset = Point::ORIGIN;
        self.zoom = self.limits.clamp(1.0);
    }

    /// Pan so that `bounds` (canvas space) is centred in a canvas element of
    /// `canvas_size` screen pixels. Zoom is left untouched.
    pub fn center_on(&mut self, bounds: Rect, canvas_size: Point) {
        let screen_center = canvas_size / 2.0;
        self.offset = screen_center - bounds.center() * self.zoom;
    }

    /// The canvas-space rectangle currently visible in a canvas element of
    /// `canvas_size` screen pixels.
    pub fn visible_rect(&self, canvas_size: Point) -> Rect {
        let top_left = self.to_canvas(Point::ORIGIN);
        Rect::new(
            top_left.x,
            top_left.y,
            canvas_size.x / self.zoom,
            canvas_size.y / self.zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: Point, b: Point) -> bool {
        let tol = 1e-9 * (1.0 + a.x.abs().max(a.y.abs()));
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
    }

    fn viewport(offset: Point, zoom: f64) -> CanvasViewport {
        let mut vp = CanvasViewport::new();
        vp.pan(offset);
        vp.zoom = zoom;
        vp
    }

    proptest! {
        #[test]
        fn screen_canvas_round_trip(
            zoom in 0.5f64..=2.0,
            ox in -1.0e4f64..1.0e4,
            oy in -1.0e4f64..1.0e4,
            px in -1.0e4f64..1.0e4,
            py in -1.0e4f64..1.0e4,
        ) {
            let vp = viewport(Point::new(ox, oy), zoom);
            let p = Point::new(px, py);
            prop_assert!(approx(vp.to_screen(vp.to_canvas(p)), p));
            prop_assert!(approx(vp.to_canvas(vp.to_screen(p)), p));
        }

        #[test]
        fn zoom_never_leaves_limits(steps in proptest::collection::vec(prop::bool::ANY, 0..200)) {
            let mut vp = CanvasViewport::new();
            for zoom_in in steps {
                vp.zoom_by(if zoom_in { 1.1 } else { 0.9 }, None);
                prop_assert!(vp.zoom() >= 0.5 && vp.zoom() <= 2.0);
            }
        }

        #[test]
        fn cursor_anchor_pins_canvas_point(
            ax in 0.0f64..2000.0,
            ay in 0.0f64..2000.0,
            zoom_in in prop::bool::ANY,
        ) {
            let mut vp = viewport(Point::new(37.0, -12.0), 1.0);
            let anchor = Point::new(ax, ay);
            let before = vp.to_canvas(anchor);
            vp.zoom_by(if zoom_in { 1.1 } else { 0.9 }, Some(anchor));
            prop_assert!(approx(vp.to_canvas(anchor), before));
        }
    }

    #[test]
    fn zoom_out_at_minimum_stays_clamped() {
        let mut vp = viewport(Point::ORIGIN, 0.5);
        assert!(!vp.zoom_by(0.9, None));
        assert_eq!(vp.zoom(), 0.5);
    }

    #[test]
    fn repeated_zoom_saturates_at_both_ends() {
        let mut vp = CanvasViewport::new();
        for _ in 0..100 {
            vp.zoom_by(0.9, None);
        }
        assert_eq!(vp.zoom(), 0.5);
        for _ in 0..100 {
            vp.zoom_by(1.1, None);
        }
        assert_eq!(vp.zoom(), 2.0);
    }

    #[test]
    fn pan_is_screen_space_at_any_zoom() {
        let mut vp = viewport(Point::ORIGIN, 2.0);
        vp.pan(Point::new(30.0, -10.0));
        assert_eq!(vp.offset(), Point::new(30.0, -10.0));
        // A canvas point moves on screen by exactly the pan delta.
        let p = Point::new(5.0, 5.0);
        let before = vp.to_screen(p);
        vp.pan(Point::new(4.0, 4.0));
        assert_eq!(vp.to_screen(p), before + Point::new(4.0, 4.0));
    }

    #[test]
    fn origin_anchored_zoom_keeps_offset() {
        let mut vp = viewport(Point::new(100.0, 50.0), 1.0);
        let cursor = Point::new(400.0, 300.0);
        let before = vp.to_canvas(cursor);
        vp.zoom_by(1.1, None);
        assert_eq!(vp.offset(), Point::new(100.0, 50.0));
        // The point under the cursor drifts.
        assert_ne!(vp.to_canvas(cursor), before);
    }

    #[test]
    fn rejects_degenerate_factors() {
        let mut vp = CanvasViewport::new();
        assert!(!vp.zoom_by(0.0, None));
        assert!(!vp.zoom_by(-1.0, None));
        assert!(!vp.zoom_by(f64::NAN, None));
        assert_eq!(vp.zoom(), 1.0);
    }

    #[test]
    fn center_on_places_bounds_in_middle() {
        let mut vp = viewport(Point::ORIGIN, 2.0);
        let bounds = Rect::new(100.0, 100.0, 200.0, 100.0);
        vp.center_on(bounds, Point::new(800.0, 600.0));
        assert_eq!(vp.to_screen(bounds.center()), Point::new(400.0, 300.0));
        assert_eq!(vp.zoom(), 2.0);
    }

    #[test]
    fn reset_returns_to_identity() {
        let mut vp = viewport(Point::new(9.0, 9.0), 1.7);
        vp.reset();
        assert_eq!(vp.offset(), Point::ORIGIN);
        assert_eq!(vp.zoom(), 1.0);
    }

    #[test]
    fn visible_rect_tracks_transform() {
        let vp = viewport(Point::new(-100.0, -50.0), 2.0);
        let rect = vp.visible_rect(Point::new(800.0, 600.0));
        assert_eq!(rect, Rect::new(50.0, 25.0, 400.0, 300.0));
    }
}
