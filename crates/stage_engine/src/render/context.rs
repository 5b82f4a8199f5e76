//! Renderer context capability
//!
//! The fixed interface the engine consumes for all device work. The embedding
//! application supplies the implementation; phases only ever hold the opaque
//! handles defined here and feed them back through the trait.
//!
//! Resource creation is legal at any time. Uploads, clears, binds and draws
//! are only legal between [`RendererContext::begin_commands`] and
//! [`RendererContext::end_commands`]; submission, waiting and presentation are
//! only legal outside that scope.

use bitflags::bitflags;

use crate::foundation::math::Mat4;
use crate::render::RenderResult;

/// Byte size of one 4x4 f32 matrix as uploaded to a uniform buffer
pub const MATRIX_SIZE: u64 = (16 * std::mem::size_of::<f32>()) as u64;

/// Handle to a device buffer owned by the renderer context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a compiled draw pipeline owned by the renderer context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle(pub u64);

/// Handle to a group of uniform buffers bound together at one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceGroupHandle(pub u64);

/// How a buffer will be consumed by draw commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Source of vertex fetch data
    Vertex,
    /// Source of 16-bit draw indices
    Index,
    /// Shader-visible constant data
    Uniform,
}

/// Declarative request for a device buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDescription {
    /// Capacity in bytes
    pub size: u64,
    /// Intended use
    pub usage: BufferUsage,
}

impl BufferDescription {
    /// Describe a vertex buffer of `size` bytes
    pub const fn vertex(size: u64) -> Self {
        Self {
            size,
            usage: BufferUsage::Vertex,
        }
    }

    /// Describe an index buffer of `size` bytes
    pub const fn index(size: u64) -> Self {
        Self {
            size,
            usage: BufferUsage::Index,
        }
    }

    /// Describe a uniform buffer of `size` bytes
    pub const fn uniform(size: u64) -> Self {
        Self {
            size,
            usage: BufferUsage::Uniform,
        }
    }
}

/// Element formats understood by the vertex fetch stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// Three consecutive f32 values
    Float3,
    /// Four consecutive f32 values
    Float4,
}

/// One named element of a vertex layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader-facing element name
    pub name: &'static str,
    /// Element format
    pub format: VertexFormat,
    /// Byte offset from the start of the vertex
    pub offset: u32,
}

/// Layout of one vertex buffer as seen by the vertex fetch stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayoutDescription {
    /// Byte distance between consecutive vertices
    pub stride: u32,
    /// Elements in declaration order
    pub attributes: Vec<VertexAttribute>,
}

bitflags! {
    /// Pipeline stages a shader set provides
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShaderStages: u32 {
        /// Vertex stage
        const VERTEX = 1 << 0;
        /// Fragment stage
        const FRAGMENT = 1 << 1;
    }
}

/// How vertices are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Every three indices form an independent triangle
    TriangleList,
    /// Each index after the first two extends a triangle strip
    TriangleStrip,
}

/// Which triangle faces the rasterizer discards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Winding order that counts as front-facing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    /// Clockwise in screen space
    Clockwise,
    /// Counter-clockwise in screen space
    CounterClockwise,
}

/// Declarative description of a draw pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDescription {
    /// Stages the pipeline's shader set covers
    pub shader_stages: ShaderStages,
    /// Layout of the single bound vertex buffer
    pub vertex_layout: VertexLayoutDescription,
    /// Primitive assembly mode
    pub topology: PrimitiveTopology,
    /// Face culling mode
    pub cull_mode: CullMode,
    /// Front-face winding
    pub front_face: FrontFace,
    /// Enable depth testing
    pub depth_test: bool,
    /// Enable depth writes
    pub depth_write: bool,
    /// Enable alpha blending against the target
    pub alpha_blending: bool,
}

impl PipelineDescription {
    /// Unlit vertex-color pipeline for simple geometry
    ///
    /// Triangle list, no culling, counter-clockwise front faces, depth test
    /// and write enabled, no blending.
    pub fn unlit(vertex_layout: VertexLayoutDescription) -> Self {
        Self {
            shader_stages: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
            vertex_layout,
            topology: PrimitiveTopology::TriangleList,
            cull_mode: CullMode::None,
            front_face: FrontFace::CounterClockwise,
            depth_test: true,
            depth_write: true,
            alpha_blending: false,
        }
    }
}

/// Device capability consumed by the engine
///
/// Implementations own every device resource they hand out; the engine sees
/// nothing but handles. The context also owns the two shared uniform buffers
/// for the camera matrices so that every pipeline binds them the same way.
pub trait RendererContext {
    /// Current drawable surface size in pixels (width, height)
    fn window_size(&self) -> (u32, u32);

    /// Open the command-recording scope
    ///
    /// Fails if a scope is already open.
    fn begin_commands(&mut self) -> RenderResult<()>;

    /// Close the command-recording scope
    ///
    /// Fails if no scope is open.
    fn end_commands(&mut self) -> RenderResult<()>;

    /// Submit all commands recorded in the last closed scope
    fn submit_commands(&mut self) -> RenderResult<()>;

    /// Block until the device has finished all submitted work
    fn wait_idle(&mut self) -> RenderResult<()>;

    /// Present the completed frame to the surface
    fn present(&mut self) -> RenderResult<()>;

    /// Create a buffer and return its handle
    fn create_buffer(&mut self, desc: &BufferDescription) -> RenderResult<BufferHandle>;

    /// Upload `data` into `buffer` starting at offset zero
    ///
    /// Must be recorded inside an open command scope. The upload must fit the
    /// buffer's capacity.
    fn update_buffer(&mut self, buffer: BufferHandle, data: &[u8]) -> RenderResult<()>;

    /// Compile a draw pipeline from a declarative description
    fn create_pipeline(&mut self, desc: &PipelineDescription) -> RenderResult<PipelineHandle>;

    /// Group uniform buffers for binding at a single slot
    fn create_resource_group(
        &mut self,
        buffers: &[BufferHandle],
    ) -> RenderResult<ResourceGroupHandle>;

    /// Clear the color target to `color` (scope-only)
    fn clear_target(&mut self, color: [f32; 4]) -> RenderResult<()>;

    /// Make `pipeline` current for subsequent draws (scope-only)
    fn bind_pipeline(&mut self, pipeline: PipelineHandle) -> RenderResult<()>;

    /// Bind the vertex buffer consumed by the next draw (scope-only)
    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) -> RenderResult<()>;

    /// Bind the 16-bit index buffer consumed by the next draw (scope-only)
    fn bind_index_buffer(&mut self, buffer: BufferHandle) -> RenderResult<()>;

    /// Bind a resource group at `slot` for the current pipeline (scope-only)
    fn bind_resource_group(&mut self, slot: u32, group: ResourceGroupHandle) -> RenderResult<()>;

    /// Draw `index_count` indices from the bound buffers (scope-only)
    fn draw_indexed(&mut self, index_count: u32) -> RenderResult<()>;

    /// Shared uniform buffer holding the camera projection matrix
    fn projection_buffer(&self) -> BufferHandle;

    /// Shared uniform buffer holding the camera view matrix
    fn view_buffer(&self) -> BufferHandle;

    /// Upload a matrix into a uniform buffer (column-major f32 layout)
    ///
    /// Convenience over [`RendererContext::update_buffer`]; same scope rules.
    fn update_matrix(&mut self, buffer: BufferHandle, matrix: &Mat4) -> RenderResult<()> {
        self.update_buffer(buffer, bytemuck::cast_slice(matrix.as_slice()))
    }
}
