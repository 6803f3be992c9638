pub mod canvas_editor;
pub mod node_palette;
