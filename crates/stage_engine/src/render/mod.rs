//! Rendering module - frame protocol and device resource abstraction
//!
//! The engine never talks to a graphics device directly. Everything goes
//! through [`RendererContext`], a capability handed in by the embedding
//! application. This module defines that interface, the camera that feeds it,
//! the RAII frame scope that keeps command recording balanced, and a
//! recording context for tests and headless runs.

pub mod camera;
pub mod context;
pub mod frame;
pub mod headless;
pub mod vertex;

pub use camera::Camera;
pub use context::{
    BufferDescription, BufferHandle, BufferUsage, CullMode, FrontFace, PipelineDescription,
    PipelineHandle, PrimitiveTopology, RendererContext, ResourceGroupHandle, ShaderStages,
    VertexAttribute, VertexFormat, VertexLayoutDescription, MATRIX_SIZE,
};
pub use frame::{FrameResources, FrameScope};
pub use headless::{FrameOp, HeadlessContext};
pub use vertex::Vertex;

use thiserror::Error;

/// Errors that can occur during rendering operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// Device resource creation failed
    #[error("resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A handle did not refer to a live resource
    #[error("invalid resource handle: {0}")]
    InvalidHandle(String),

    /// A command was recorded outside the begin/end scope that must hold it
    #[error("command scope violation: {0}")]
    CommandScopeViolation(String),

    /// A buffer upload did not fit its destination
    #[error("buffer upload failed: {0}")]
    UploadFailed(String),

    /// Submitting or presenting recorded work failed
    #[error("frame submission failed: {0}")]
    SubmissionFailed(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
