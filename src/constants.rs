//! Constants for the canvas editor
//!
//! Geometry defaults, colours and DOM identifiers live here so the renderer,
//! the hit tester and the DOM shell agree on a single set of values.

// Viewport
pub const DEFAULT_MIN_ZOOM: f64 = 0.5;
pub const DEFAULT_MAX_ZOOM: f64 = 2.0;
pub const ZOOM_IN_FACTOR: f64 = 1.1;
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

// Node dimensions (canvas units)
pub const DEFAULT_NODE_WIDTH: f64 = 200.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;
pub const NODE_CORNER_RADIUS: f64 = 12.0;

// Connectors
pub const CONNECTOR_RADIUS: f64 = 6.0;
pub const CONNECTOR_HOVER_RADIUS: f64 = 8.0;
/// Extra canvas units around a connector that still count as a hit.
pub const CONNECTOR_HIT_SLOP: f64 = 3.0;

// Connections
pub const CONNECTION_HIT_WIDTH: f64 = 20.0;
pub const CONNECTION_LINE_WIDTH: f64 = 2.0;
/// Horizontal control-point offset as a fraction of |targetX - sourceX|.
pub const BEZIER_CURVATURE: f64 = 0.5;
/// Segments used when flattening a Bezier for hit testing.
pub const BEZIER_HIT_SAMPLES: usize = 32;
pub const CONTROL_DASH: [f64; 2] = [8.0, 4.0];
pub const PREVIEW_DASH: [f64; 2] = [5.0, 5.0];
pub const FLOW_DASH: [f64; 2] = [10.0, 10.0];
pub const PREVIEW_ALPHA: f64 = 0.6;

// Interaction
pub const CLICK_SLOP_PX: f64 = 5.0;
pub const FLOW_ANIMATION_STEP: f64 = 0.5;
pub const FLOW_ANIMATION_WRAP: f64 = 100.0;

// Canvas colours
pub const CANVAS_BACKGROUND_COLOR: &str = "#0f0f17";
pub const CANVAS_GRID_COLOR: &str = "rgba(255, 255, 255, 0.04)";
pub const CANVAS_GRID_SPACING: f64 = 24.0;
pub const SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.25)";
pub const NODE_FILL_COLOR: &str = "#1e1e2e";
pub const NODE_BORDER_DEFAULT: &str = "rgba(255, 255, 255, 0.08)";
pub const NODE_BORDER_SELECTED: &str = "#ffffff";
pub const NODE_TITLE_COLOR: &str = "#ffffff";
pub const NODE_TEXT_COLOR: &str = "rgba(255, 255, 255, 0.7)";

// Connector colours
pub const INPUT_CONNECTOR_COLOR: &str = "#22c55e";
pub const OUTPUT_CONNECTOR_COLOR: &str = "#3b82f6";
pub const CONNECTOR_HOVER_COLOR: &str = "#f59e0b";
pub const CONNECTOR_FILL_COLOR: &str = "#ffffff";

// Connection stroke colours
pub const CONNECTION_DATA_COLOR: &str = "#95a5a6";
pub const CONNECTION_CONTROL_COLOR: &str = "#f59e0b"; // amber-500
pub const CONNECTION_ERROR_COLOR: &str = "#ef4444"; // red-500
pub const CONNECTION_PREVIEW_COLOR: &str = "#3b82f6";
pub const FLOW_ACTIVE_COLOR: &str = "#22c55e";
pub const FLOW_GLOW_RGB: &str = "34, 197, 94";

// Node status colours
pub const STATUS_IDLE_COLOR: &str = "#94a3b8"; // slate-400
pub const STATUS_RUNNING_COLOR: &str = "#fbbf24"; // amber-400
pub const STATUS_COMPLETED_COLOR: &str = "#22c55e"; // green-500
pub const STATUS_FAILED_COLOR: &str = "#ef4444"; // red-500
pub const STATUS_RUNNING_GLOW_RGB: &str = "251, 191, 36";

// Drag-and-drop payload
pub const TEMPLATE_MIME_TYPE: &str = "application/json";

// DOM classes
pub const CSS_DROP_TARGET: &str = "canvas-drop-target";
pub const CSS_PALETTE_ITEM: &str = "palette-item";
pub const CSS_PALETTE_HEADER: &str = "palette-header";

// Host callback names
pub const EVENT_NODE_MOVE: &str = "nodeMove";
pub const EVENT_NODE_CONNECT: &str = "nodeConnect";
pub const EVENT_NODE_DELETE: &str = "nodeDelete";
pub const EVENT_NODE_SELECT: &str = "nodeSelect";
pub const EVENT_DROP: &str = "drop";
pub const EVENT_CONNECTION_DELETE: &str = "connectionDelete";
pub const EVENT_WORKFLOW_CREATED: &str = "workflowCreated";
pub const EVENT_EXECUTION_FAILED: &str = "executionFailed";

// Instruction text
pub const INSTRUCTION_PREFIX: &str = "Create a workflow that: ";
pub const FRAGMENT_SEPARATOR: &str = " → ";
pub const SOURCES_PREFIX: &str = " (using data from: ";
