use super::geometry::{connection_paths, node_position, ConnectionPath, ConnectionStyle, NodeMetrics};
use super::shapes;
use crate::constants::*;
use crate::models::{ConnectionType, ConnectorKind, Node, NodeStatus, Point};
use crate::rgba;
use crate::state::EditorState;
use crate::viewport::CanvasViewport;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Repaint the whole canvas from `state`. A no-op until the canvas is mounted.
pub fn draw_editor(state: &EditorState) -> Result<(), JsValue> {
    let (Some(canvas), Some(context)) = (&state.canvas, &state.context) else {
        return Ok(());
    };
    let dpr = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);

    context.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
    context.set_fill_style_str(CANVAS_BACKGROUND_COLOR);
    context.fill_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);

    context.save();
    apply_viewport(context, &state.viewport, dpr)?;

    let css_size = state.canvas_size.unwrap_or_else(|| {
        Point::new(canvas.width() as f64 / dpr, canvas.height() as f64 / dpr)
    });
    draw_grid(context, &state.viewport, css_size);

    let moving = state.moving_node();
    for path in connection_paths(&state.graph, &state.metrics, moving) {
        draw_connection(context, &path, state.flow_offset)?;
    }

    if let Some(curve) = state.engine.preview(&state.drag, &state.graph, &state.metrics) {
        let style = ConnectionStyle::for_type(ConnectionType::Preview);
        context.save();
        context.set_global_alpha(style.alpha);
        context.set_stroke_style_str(style.color);
        context.set_line_width(style.width);
        shapes::set_dash(context, style.dash)?;
        shapes::bezier_path(context, &curve);
        context.stroke();
        context.restore();
    }

    for node in state.graph.nodes() {
        let position = node_position(node, moving);
        let selected = state.selected_node_id.as_deref() == Some(node.id.as_str());
        draw_node(context, node, position, &state.metrics, selected, state)?;
    }

    context.restore();
    Ok(())
}

/// Device pixel ratio first, then the viewport's zoom and pan. This is the
/// same mapping as `CanvasViewport::to_screen`, scaled to backing pixels.
fn apply_viewport(
    context: &CanvasRenderingContext2d,
    viewport: &CanvasViewport,
    dpr: f64,
) -> Result<(), JsValue> {
    let scale = dpr * viewport.zoom();
    let offset = viewport.offset() * dpr;
    context.set_transform(scale, 0.0, 0.0, scale, offset.x, offset.y)
}

fn draw_grid(context: &CanvasRenderingContext2d, viewport: &CanvasViewport, css_size: Point) {
    let visible = viewport.visible_rect(css_size);
    let start_x = (visible.x / CANVAS_GRID_SPACING).floor() * CANVAS_GRID_SPACING;
    let start_y = (visible.y / CANVAS_GRID_SPACING).floor() * CANVAS_GRID_SPACING;

    context.save();
    context.set_stroke_style_str(CANVAS_GRID_COLOR);
    context.set_line_width(1.0 / viewport.zoom());
    context.begin_path();
    let mut x = start_x;
    while x <= visible.x + visible.width {
        context.move_to(x, visible.y);
        context.line_to(x, visible.y + visible.height);
        x += CANVAS_GRID_SPACING;
    }
    let mut y = start_y;
    while y <= visible.y + visible.height {
        context.move_to(visible.x, y);
        context.line_to(visible.x + visible.width, y);
        y += CANVAS_GRID_SPACING;
    }
    context.stroke();
    context.restore();
}

fn draw_connection(
    context: &CanvasRenderingContext2d,
    path: &ConnectionPath<'_>,
    flow_offset: f64,
) -> Result<(), JsValue> {
    let style = path.style;
    context.save();
    context.set_global_alpha(style.alpha);
    context.set_stroke_style_str(style.color);
    context.set_line_width(style.width);
    shapes::set_dash(context, style.dash)?;
    shapes::bezier_path(context, &path.curve);
    context.stroke();

    if path.flowing {
        context.set_stroke_style_str(FLOW_ACTIVE_COLOR);
        context.set_line_width(style.width + 1.0);
        context.set_shadow_color(&rgba!(FLOW_GLOW_RGB, 0.8));
        context.set_shadow_blur(8.0);
        shapes::set_dash(context, Some(FLOW_DASH))?;
        context.set_line_dash_offset(flow_offset);
        context.stroke();
    }
    context.restore();
    Ok(())
}

fn draw_node(
    context: &CanvasRenderingContext2d,
    node: &Node,
    position: Point,
    metrics: &NodeMetrics,
    selected: bool,
    state: &EditorState,
) -> Result<(), JsValue> {
    let Point { x, y } = position;
    let (w, h) = (metrics.width, metrics.height);
    let header_h = (h * 0.36).min(36.0);

    if node.status == NodeStatus::Running {
        context.save();
        context.set_shadow_color(&rgba!(STATUS_RUNNING_GLOW_RGB, 0.6));
        context.set_shadow_blur(16.0);
        context.set_fill_style_str(NODE_FILL_COLOR);
        shapes::rounded_rect_path(context, x, y, w, h, NODE_CORNER_RADIUS);
        context.fill();
        context.restore();
    }

    let (border, border_width) = if selected {
        (NODE_BORDER_SELECTED, 2.0)
    } else {
        (NODE_BORDER_DEFAULT, 1.0)
    };
    shapes::draw_card(context, x, y, w, h, border, border_width);
    shapes::draw_header(context, x, y, w, header_h, &node.color_gradient)?;

    // Header: icon + title
    context.save();
    context.set_fill_style_str(NODE_TITLE_COLOR);
    context.set_text_baseline("middle");
    context.set_text_align("left");
    context.set_font("600 14px system-ui, -apple-system, sans-serif");
    let title_x = if node.icon.is_empty() {
        x + 12.0
    } else {
        context.fill_text(&node.icon, x + 10.0, y + header_h / 2.0)?;
        x + 32.0
    };
    let title = shapes::fit_text(context, &node.title, x + w - 28.0 - title_x);
    context.fill_text(&title, title_x, y + header_h / 2.0)?;
    context.restore();

    // Body: one line of description
    if !node.description.is_empty() {
        context.save();
        context.set_fill_style_str(NODE_TEXT_COLOR);
        context.set_text_baseline("top");
        context.set_font("12px system-ui, -apple-system, sans-serif");
        let desc = shapes::fit_text(context, &node.description, w - 24.0);
        context.fill_text(&desc, x + 12.0, y + header_h + 10.0)?;
        context.restore();
    }

    shapes::draw_circle(
        context,
        Point::new(x + w - 14.0, y + header_h / 2.0),
        4.0,
        status_color(node.status),
        status_color(node.status),
    )?;

    draw_connectors(context, node, position, metrics, state)
}

fn draw_connectors(
    context: &CanvasRenderingContext2d,
    node: &Node,
    position: Point,
    metrics: &NodeMetrics,
    state: &EditorState,
) -> Result<(), JsValue> {
    for (kind, ring) in [
        (ConnectorKind::Input, INPUT_CONNECTOR_COLOR),
        (ConnectorKind::Output, OUTPUT_CONNECTOR_COLOR),
    ] {
        let hovered = matches!(
            &state.hovered_connector,
            Some((id, k)) if *id == node.id && *k == kind
        );
        let source = matches!(
            &state.drag,
            crate::drag::DragState::ConnectingFromOutput { source_id, .. }
                if kind == ConnectorKind::Output && *source_id == node.id
        );
        let (radius, stroke) = if hovered || source {
            (CONNECTOR_HOVER_RADIUS.max(metrics.connector_radius), CONNECTOR_HOVER_COLOR)
        } else {
            (metrics.connector_radius, ring)
        };
        shapes::draw_circle(
            context,
            metrics.anchor(position, kind),
            radius,
            CONNECTOR_FILL_COLOR,
            stroke,
        )?;
    }
    Ok(())
}

fn status_color(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Idle => STATUS_IDLE_COLOR,
        NodeStatus::Running => STATUS_RUNNING_COLOR,
        NodeStatus::Completed => STATUS_COMPLETED_COLOR,
        NodeStatus::Failed => STATUS_FAILED_COLOR,
    }
}
