/// Stream compaction of admitted points
///
/// Admitted points are appended to a dense buffer through an atomic
/// counter that doubles as the vertex count of an indirect draw.

pub mod append_buffer;
pub mod draw_parameters;

pub use append_buffer::PointAppender;
pub use draw_parameters::{DrawParameters, OutputCount};
