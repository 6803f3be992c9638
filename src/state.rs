use crate::canvas::geometry::{NodeMetrics, PositionOverride};
use crate::catalog::TaskCatalog;
use crate::compiler::InstructionCompiler;
use crate::config::EditorConfig;
use crate::connection::ConnectionEngine;
use crate::drag::DragState;
use crate::graph::WorkflowGraph;
use crate::messages::{Command, Message};
use crate::models::{ConnectorKind, Point};
use crate::viewport::{CanvasViewport, ZoomLimits};
use std::cell::RefCell;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Everything one editor session owns.
pub struct EditorState {
    pub config: EditorConfig,
    pub catalog: TaskCatalog,
    pub graph: WorkflowGraph,
    pub viewport: CanvasViewport,
    pub drag: DragState,
    pub engine: ConnectionEngine,
    pub compiler: InstructionCompiler,
    pub metrics: NodeMetrics,

    pub selected_node_id: Option<String>,
    /// Connector under the pointer, for hover highlighting.
    pub hovered_connector: Option<(String, ConnectorKind)>,
    /// CSS size of the canvas element; `None` until the DOM reports it.
    pub canvas_size: Option<Point>,
    pub flow_offset: f64,

    /// A `createWorkflow` request is outstanding; further execute requests
    /// are ignored until it settles.
    pub executing: bool,

    pub canvas: Option<HtmlCanvasElement>,
    pub context: Option<CanvasRenderingContext2d>,
    dirty: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorState {
    /// Caller validates `config` first (see `EditorConfig::validate`).
    pub fn new(config: EditorConfig) -> Self {
        Self {
            catalog: TaskCatalog::default(),
            graph: WorkflowGraph::new(),
            viewport: CanvasViewport::with_limits(ZoomLimits {
                min: config.min_zoom,
                max: config.max_zoom,
            }),
            drag: DragState::Idle,
            engine: ConnectionEngine::new(config.complete_on_hover),
            compiler: InstructionCompiler::new(config.compile_order),
            metrics: NodeMetrics::from(&config),
            selected_node_id: None,
            hovered_connector: None,
            canvas_size: None,
            flow_offset: 0.0,
            executing: false,
            canvas: None,
            context: None,
            dirty: true,
            config,
        }
    }

    /// Swap in a new configuration. The graph and catalog are kept; the
    /// viewport and any gesture in progress are reset.
    pub fn reconfigure(&mut self, config: EditorConfig) {
        let mut fresh = Self::new(config);
        fresh.catalog = std::mem::take(&mut self.catalog);
        fresh.graph = std::mem::take(&mut self.graph);
        fresh.canvas_size = self.canvas_size;
        fresh.canvas = self.canvas.take();
        fresh.context = self.context.take();
        *self = fresh;
    }

    pub fn dispatch(&mut self, msg: Message) -> Vec<Command> {
        crate::reducers::update(self, msg)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return and clear the repaint flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Pending position of the node being dragged, for the renderer.
    pub fn moving_node(&self) -> Option<PositionOverride<'_>> {
        self.drag
            .moving_node()
            .map(|(node_id, position)| PositionOverride { node_id, position })
    }

    /// Whether a screen point lies inside the canvas element. Unknown size
    /// accepts everything.
    pub fn contains_screen_point(&self, p: Point) -> bool {
        match self.canvas_size {
            Some(size) => p.x >= 0.0 && p.y >= 0.0 && p.x <= size.x && p.y <= size.y,
            None => true,
        }
    }
}

thread_local! {
    pub static EDITOR_STATE: RefCell<EditorState> = RefCell::new(EditorState::default());
}

pub fn dispatch_global_message(msg: Message) {
    // 1. Perform state updates and collect commands
    let commands = EDITOR_STATE.with(|state| state.borrow_mut().dispatch(msg));

    // 2. Execute commands after the borrow is dropped
    for cmd in commands {
        match cmd {
            Command::Emit(event) => crate::callbacks::emit(&event),
            cmd @ Command::CreateWorkflowApi { .. } => {
                crate::command_executors::execute_network_command(cmd)
            }
        }
    }
}
