//! Frame protocol plumbing
//!
//! [`FrameScope`] keeps begin/end command recording balanced on every path,
//! including early error returns. [`FrameResources`] owns one state's device
//! set (geometry, model matrix buffer, pipeline, bind groups) and plays the
//! fixed per-frame command sequence against it.

use crate::foundation::math::Mat4;
use crate::render::camera::Camera;
use crate::render::context::{
    BufferDescription, BufferHandle, PipelineDescription, PipelineHandle, RendererContext,
    ResourceGroupHandle, MATRIX_SIZE,
};
use crate::render::vertex::Vertex;
use crate::render::RenderResult;

/// RAII guard for the begin/end command scope
///
/// Dropping an unfinished scope closes it, so a `?` return in the middle of
/// recording cannot leave the context stuck inside a scope.
pub struct FrameScope<'a> {
    ctx: &'a mut dyn RendererContext,
    open: bool,
}

impl<'a> FrameScope<'a> {
    /// Open a command scope on `ctx`
    pub fn begin(ctx: &'a mut dyn RendererContext) -> RenderResult<Self> {
        ctx.begin_commands()?;
        Ok(Self { ctx, open: true })
    }

    /// Access the context to record commands while the scope is open
    pub fn ctx(&mut self) -> &mut dyn RendererContext {
        &mut *self.ctx
    }

    /// Close the scope, submit its commands and wait for the device
    ///
    /// Presentation stays with the caller: a resource setup pass submits
    /// without presenting, a frame pass presents afterwards.
    pub fn finish(mut self) -> RenderResult<()> {
        self.open = false;
        self.ctx.end_commands()?;
        self.ctx.submit_commands()?;
        self.ctx.wait_idle()
    }
}

impl Drop for FrameScope<'_> {
    fn drop(&mut self) {
        if self.open {
            // Unwinding out of a recording error: the scope still has to be
            // closed so the context stays usable for the next frame.
            if let Err(err) = self.ctx.end_commands() {
                log::error!("failed to close command scope: {err}");
            }
        }
    }
}

/// Per-state device resources and the frame sequence that consumes them
pub struct FrameResources {
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    model_buffer: BufferHandle,
    pipeline: PipelineHandle,
    camera_group: ResourceGroupHandle,
    model_group: ResourceGroupHandle,
    index_count: u32,
}

impl FrameResources {
    /// Upload geometry and build the draw pipeline in one synchronous setup pass
    ///
    /// Opens its own command scope, creates and fills the model, vertex and
    /// index buffers, then submits and waits so everything is device-ready
    /// before the first frame touches it. The pipeline and bind groups are
    /// created after the scope closes.
    pub fn create(
        ctx: &mut dyn RendererContext,
        vertices: &[Vertex],
        indices: &[u16],
    ) -> RenderResult<Self> {
        let mut scope = FrameScope::begin(ctx)?;
        let recorder = scope.ctx();

        let model_buffer = recorder.create_buffer(&BufferDescription::uniform(MATRIX_SIZE))?;
        recorder.update_matrix(model_buffer, &Mat4::identity())?;

        let vertex_buffer = recorder.create_buffer(&BufferDescription::vertex(
            std::mem::size_of_val(vertices) as u64,
        ))?;
        recorder.update_buffer(vertex_buffer, bytemuck::cast_slice(vertices))?;

        let index_buffer = recorder.create_buffer(&BufferDescription::index(
            std::mem::size_of_val(indices) as u64,
        ))?;
        recorder.update_buffer(index_buffer, bytemuck::cast_slice(indices))?;

        scope.finish()?;

        let pipeline = ctx.create_pipeline(&PipelineDescription::unlit(Vertex::layout()))?;
        let projection = ctx.projection_buffer();
        let view = ctx.view_buffer();
        let camera_group = ctx.create_resource_group(&[projection, view])?;
        let model_group = ctx.create_resource_group(&[model_buffer])?;

        Ok(Self {
            vertex_buffer,
            index_buffer,
            model_buffer,
            pipeline,
            camera_group,
            model_group,
            index_count: indices.len() as u32,
        })
    }

    /// Record and submit one complete frame
    ///
    /// The sequence is fixed: follow the surface size, open the scope, upload
    /// projection, view and model matrices, clear, bind pipeline, geometry
    /// and uniform groups, draw, then close, submit, wait and present.
    pub fn draw(
        &self,
        ctx: &mut dyn RendererContext,
        camera: &mut Camera,
        model: &Mat4,
        clear_color: [f32; 4],
    ) -> RenderResult<()> {
        let (width, height) = ctx.window_size();
        if camera.viewport() != (width as f32, height as f32) {
            camera.viewport_resized(width as f32, height as f32);
        }

        let mut scope = FrameScope::begin(ctx)?;
        let recorder = scope.ctx();

        let projection_buffer = recorder.projection_buffer();
        recorder.update_matrix(projection_buffer, &camera.projection_matrix())?;
        let view_buffer = recorder.view_buffer();
        recorder.update_matrix(view_buffer, &camera.view_matrix())?;
        recorder.update_matrix(self.model_buffer, model)?;

        recorder.clear_target(clear_color)?;

        recorder.bind_pipeline(self.pipeline)?;
        recorder.bind_vertex_buffer(self.vertex_buffer)?;
        recorder.bind_index_buffer(self.index_buffer)?;
        recorder.bind_resource_group(0, self.camera_group)?;
        recorder.bind_resource_group(1, self.model_group)?;

        recorder.draw_indexed(self.index_count)?;

        scope.finish()?;
        ctx.present()
    }

    /// Number of indices drawn per frame
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Uniform buffer holding this state's model matrix
    pub fn model_buffer(&self) -> BufferHandle {
        self.model_buffer
    }
}
