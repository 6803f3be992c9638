pub mod geometry;
pub mod renderer;
pub mod shapes;
