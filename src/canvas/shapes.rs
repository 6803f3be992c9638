use super::geometry::CubicBezier;
use crate::constants::*;
use crate::models::{ColorGradient, Point};
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

// Creates a rounded rectangle path without filling or stroking
pub fn rounded_rect_path(
    context: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
) {
    let radius = radius.min(width / 2.0).min(height / 2.0);
    context.begin_path();
    context.move_to(x + radius, y);
    context.line_to(x + width - radius, y);
    context.quadratic_curve_to(x + width, y, x + width, y + radius);
    context.line_to(x + width, y + height - radius);
    context.quadratic_curve_to(x + width, y + height, x + width - radius, y + height);
    context.line_to(x + radius, y + height);
    context.quadratic_curve_to(x, y + height, x, y + height - radius);
    context.line_to(x, y + radius);
    context.quadratic_curve_to(x, y, x + radius, y);
    context.close_path();
}

/// Node card: shadowed body plus a thin border.
pub fn draw_card(
    context: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    border: &str,
    border_width: f64,
) {
    context.save();

    context.set_shadow_color(SHADOW_COLOR);
    context.set_shadow_blur(8.0);
    context.set_shadow_offset_x(0.0);
    context.set_shadow_offset_y(2.0);
    context.set_fill_style_str(NODE_FILL_COLOR);
    rounded_rect_path(context, x, y, width, height, NODE_CORNER_RADIUS);
    context.fill();

    context.set_shadow_blur(0.0);
    context.set_shadow_offset_y(0.0);
    context.set_line_width(border_width);
    context.set_stroke_style_str(border);
    context.stroke();

    context.restore();
}

/// Gradient strip across the top of a card, clipped to its rounded corners.
pub fn draw_header(
    context: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    gradient: &ColorGradient,
) -> Result<(), JsValue> {
    let fill = context.create_linear_gradient(x, y, x + width, y);
    fill.add_color_stop(0.0, &gradient.from)?;
    fill.add_color_stop(1.0, &gradient.to)?;

    context.save();
    rounded_rect_path(context, x, y, width, height + NODE_CORNER_RADIUS, NODE_CORNER_RADIUS);
    context.clip();
    context.set_fill_style_canvas_gradient(&fill);
    context.fill_rect(x, y, width, height);
    context.restore();
    Ok(())
}

pub fn draw_circle(
    context: &CanvasRenderingContext2d,
    center: Point,
    radius: f64,
    fill: &str,
    stroke: &str,
) -> Result<(), JsValue> {
    context.begin_path();
    context.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)?;
    context.set_fill_style_str(fill);
    context.fill();
    context.set_line_width(2.0);
    context.set_stroke_style_str(stroke);
    context.stroke();
    Ok(())
}

pub fn bezier_path(context: &CanvasRenderingContext2d, curve: &CubicBezier) {
    context.begin_path();
    context.move_to(curve.start.x, curve.start.y);
    context.bezier_curve_to(
        curve.c1.x, curve.c1.y, curve.c2.x, curve.c2.y, curve.end.x, curve.end.y,
    );
}

pub fn set_dash(context: &CanvasRenderingContext2d, dash: Option<[f64; 2]>) -> Result<(), JsValue> {
    let pattern = js_sys::Array::new();
    if let Some([on, off]) = dash {
        pattern.push(&on.into());
        pattern.push(&off.into());
    }
    context.set_line_dash(&pattern)
}

/// Fit `text` into `max_width` pixels, cutting on grapheme boundaries and
/// appending an ellipsis.
pub fn fit_text<'a>(context: &CanvasRenderingContext2d, text: &'a str, max_width: f64) -> Cow<'a, str> {
    fit_with(text, |s| {
        context
            .measure_text(s)
            .map(|m| m.width() <= max_width)
            .unwrap_or(true)
    })
}

/// Longest ellipsized prefix of `text` accepted by `fits`, found by binary
/// search over the grapheme count. `fits` must be monotonic in length.
pub fn fit_with<'a>(text: &'a str, mut fits: impl FnMut(&str) -> bool) -> Cow<'a, str> {
    if fits(text) {
        return Cow::Borrowed(text);
    }
    if !fits(&ellipsize(text, 0)) {
        return Cow::Borrowed("");
    }
    // `lo` graphemes fit, `hi` do not.
    let (mut lo, mut hi) = (0, text.graphemes(true).count());
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if fits(&ellipsize(text, mid)) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    ellipsize(text, lo)
}

/// First `max_graphemes` grapheme clusters of `text`, with "…" appended if
/// anything was cut.
pub fn ellipsize(text: &str, max_graphemes: usize) -> Cow<'_, str> {
    match text.grapheme_indices(true).nth(max_graphemes) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}…", &text[..cut])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipsize_keeps_short_text() {
        assert_eq!(ellipsize("Search", 10), "Search");
        assert!(matches!(ellipsize("Search", 6), Cow::Borrowed(_)));
    }

    #[test]
    fn ellipsize_cuts_on_grapheme_boundaries() {
        assert_eq!(ellipsize("Summarize", 3), "Sum…");
        // Family emoji is one grapheme made of several code points.
        assert_eq!(ellipsize("👨‍👩‍👧ab", 1), "👨‍👩‍👧…");
        assert_eq!(ellipsize("abc", 0), "…");
    }

    #[test]
    fn fit_keeps_longest_prefix_that_fits() {
        let width = |s: &str| s.graphemes(true).count();
        assert_eq!(fit_with("Analyze", |s| width(s) <= 10), "Analyze");
        assert_eq!(fit_with("Summarize", |s| width(s) <= 4), "Sum…");
        assert_eq!(fit_with("Summarize", |s| width(s) <= 1), "…");
        assert_eq!(fit_with("Summarize", |_| false), "");
    }

    #[test]
    fn fit_measures_logarithmically() {
        let text = "x".repeat(4096);
        let mut calls = 0;
        let fitted = fit_with(&text, |s| {
            calls += 1;
            s.graphemes(true).count() <= 100
        });
        assert_eq!(fitted.graphemes(true).count(), 100);
        assert!(fitted.ends_with('…'));
        // Full text, bare ellipsis, then at most log2(4096) halvings.
        assert!(calls <= 2 + 13, "measured {calls} times");
    }
}
