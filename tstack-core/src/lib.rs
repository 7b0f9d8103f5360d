/// TStack Core Library - hierarchical transform stacks
///
/// This library provides save/restore stacks of 4x4 transforms for the model,
/// view and projection channels of a renderer, the matrix builders they
/// compose, and the upload boundary through which matrices reach shaders.

pub mod camera;
pub mod channel;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod stack;
pub mod transform;

// Re-export commonly used types
pub use camera::{OrbitCamera, SquareCamera};
pub use channel::{Channel, MatrixSink, Transforms};
pub use error::StackError;
pub use geometry::{Mesh, Triangle, Vertex};
pub use projection::{ProjectionBox, ProjectionMode, ProjectionSettings};
pub use stack::TransformStack;
pub use transform::Transform;
