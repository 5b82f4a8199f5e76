//! Recording renderer context
//!
//! [`HeadlessContext`] implements [`RendererContext`] against plain memory
//! instead of a graphics device. It enforces the same command-scope rules a
//! real device backend would, and it journals every accepted operation so
//! callers can assert on the exact command sequence a frame produced. The
//! demo binary also runs against it, which keeps the engine free of any
//! device dependency.

use slotmap::{new_key_type, Key, KeyData, SlotMap};

use crate::render::context::{
    BufferDescription, BufferHandle, BufferUsage, PipelineDescription, PipelineHandle,
    RendererContext, ResourceGroupHandle, MATRIX_SIZE,
};
use crate::render::{RenderError, RenderResult};

new_key_type! {
    struct BufferKey;
    struct PipelineKey;
    struct GroupKey;
}

fn buffer_key(handle: BufferHandle) -> BufferKey {
    BufferKey::from(KeyData::from_ffi(handle.0))
}

fn pipeline_key(handle: PipelineHandle) -> PipelineKey {
    PipelineKey::from(KeyData::from_ffi(handle.0))
}

fn group_key(handle: ResourceGroupHandle) -> GroupKey {
    GroupKey::from(KeyData::from_ffi(handle.0))
}

/// One accepted context operation, in acceptance order
///
/// Only operations that participate in the frame protocol are journaled;
/// resource creation is observable through the handles it returns.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOp {
    /// Command scope opened
    BeginCommands,
    /// Command scope closed
    EndCommands,
    /// Closed scope submitted to the device
    SubmitCommands,
    /// Device drained
    WaitIdle,
    /// Frame handed to the surface
    Present,
    /// Bytes uploaded into a buffer
    UpdateBuffer(BufferHandle),
    /// Color target cleared
    ClearTarget([f32; 4]),
    /// Pipeline made current
    BindPipeline(PipelineHandle),
    /// Vertex buffer bound
    BindVertexBuffer(BufferHandle),
    /// Index buffer bound
    BindIndexBuffer(BufferHandle),
    /// Resource group bound at a slot
    BindResourceGroup(u32, ResourceGroupHandle),
    /// Indexed draw recorded
    DrawIndexed(u32),
}

struct BufferRecord {
    usage: BufferUsage,
    contents: Vec<u8>,
}

impl BufferRecord {
    fn matrix_uniform() -> Self {
        Self {
            usage: BufferUsage::Uniform,
            contents: vec![0; MATRIX_SIZE as usize],
        }
    }
}

struct PipelineRecord {
    description: PipelineDescription,
}

struct GroupRecord {
    buffers: Vec<BufferHandle>,
}

/// In-memory renderer context with full protocol checking
///
/// Owns the two shared camera uniform buffers, hands out slotmap-backed
/// handles for everything it creates, and rejects commands issued outside
/// the scope that must hold them.
pub struct HeadlessContext {
    width: u32,
    height: u32,
    buffers: SlotMap<BufferKey, BufferRecord>,
    pipelines: SlotMap<PipelineKey, PipelineRecord>,
    groups: SlotMap<GroupKey, GroupRecord>,
    projection_buffer: BufferHandle,
    view_buffer: BufferHandle,
    recording: bool,
    bound_pipeline: Option<PipelineHandle>,
    bound_vertex: Option<BufferHandle>,
    bound_index: Option<BufferHandle>,
    journal: Vec<FrameOp>,
    frames_presented: u64,
}

impl HeadlessContext {
    /// Create a context for a surface of the given pixel size
    pub fn new(width: u32, height: u32) -> Self {
        let mut buffers = SlotMap::with_key();
        let projection_key = buffers.insert(BufferRecord::matrix_uniform());
        let view_key = buffers.insert(BufferRecord::matrix_uniform());

        Self {
            width,
            height,
            buffers,
            pipelines: SlotMap::with_key(),
            groups: SlotMap::with_key(),
            projection_buffer: BufferHandle(projection_key.data().as_ffi()),
            view_buffer: BufferHandle(view_key.data().as_ffi()),
            recording: false,
            bound_pipeline: None,
            bound_vertex: None,
            bound_index: None,
            journal: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Adopt a new surface size, as a swapchain recreation would
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("surface resized to {width}x{height}");
        self.width = width;
        self.height = height;
    }

    /// Operations accepted since the most recent `begin_commands`
    ///
    /// The journal resets when a scope opens, so after a frame it holds that
    /// frame's complete command sequence including the trailing submit, wait
    /// and present.
    pub fn journal(&self) -> &[FrameOp] {
        &self.journal
    }

    /// Number of frames handed to the surface so far
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Number of live buffers, including the two camera uniform buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of live pipelines
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Number of live resource groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Current bytes of a buffer, if the handle is live
    pub fn buffer_contents(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.buffers
            .get(buffer_key(handle))
            .map(|record| record.contents.as_slice())
    }

    /// Description a pipeline was created from, if the handle is live
    pub fn pipeline_description(&self, handle: PipelineHandle) -> Option<&PipelineDescription> {
        self.pipelines
            .get(pipeline_key(handle))
            .map(|record| &record.description)
    }

    /// Buffers a resource group binds, in declaration order
    pub fn group_buffers(&self, handle: ResourceGroupHandle) -> Option<&[BufferHandle]> {
        self.groups
            .get(group_key(handle))
            .map(|record| record.buffers.as_slice())
    }

    fn require_scope(&self, what: &str) -> RenderResult<()> {
        if self.recording {
            Ok(())
        } else {
            Err(RenderError::CommandScopeViolation(format!(
                "{what} outside the begin/end command scope"
            )))
        }
    }

    fn require_no_scope(&self, what: &str) -> RenderResult<()> {
        if self.recording {
            Err(RenderError::CommandScopeViolation(format!(
                "{what} while the command scope is open"
            )))
        } else {
            Ok(())
        }
    }

    fn buffer(&self, handle: BufferHandle) -> RenderResult<&BufferRecord> {
        self.buffers
            .get(buffer_key(handle))
            .ok_or_else(|| RenderError::InvalidHandle(format!("buffer {}", handle.0)))
    }

    fn buffer_mut(&mut self, handle: BufferHandle) -> RenderResult<&mut BufferRecord> {
        self.buffers
            .get_mut(buffer_key(handle))
            .ok_or_else(|| RenderError::InvalidHandle(format!("buffer {}", handle.0)))
    }
}

impl RendererContext for HeadlessContext {
    fn window_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn begin_commands(&mut self) -> RenderResult<()> {
        self.require_no_scope("begin_commands")?;
        self.recording = true;
        self.bound_pipeline = None;
        self.bound_vertex = None;
        self.bound_index = None;
        self.journal.clear();
        self.journal.push(FrameOp::BeginCommands);
        log::trace!("begin_commands");
        Ok(())
    }

    fn end_commands(&mut self) -> RenderResult<()> {
        self.require_scope("end_commands")?;
        self.recording = false;
        self.journal.push(FrameOp::EndCommands);
        log::trace!("end_commands");
        Ok(())
    }

    fn submit_commands(&mut self) -> RenderResult<()> {
        self.require_no_scope("submit_commands")?;
        self.journal.push(FrameOp::SubmitCommands);
        log::trace!("submit_commands");
        Ok(())
    }

    fn wait_idle(&mut self) -> RenderResult<()> {
        self.require_no_scope("wait_idle")?;
        self.journal.push(FrameOp::WaitIdle);
        log::trace!("wait_idle");
        Ok(())
    }

    fn present(&mut self) -> RenderResult<()> {
        self.require_no_scope("present")?;
        self.frames_presented += 1;
        self.journal.push(FrameOp::Present);
        log::trace!("present (frame {})", self.frames_presented);
        Ok(())
    }

    fn create_buffer(&mut self, desc: &BufferDescription) -> RenderResult<BufferHandle> {
        if desc.size == 0 {
            return Err(RenderError::ResourceCreationFailed(
                "zero-size buffer".to_string(),
            ));
        }
        let key = self.buffers.insert(BufferRecord {
            usage: desc.usage,
            contents: vec![0; desc.size as usize],
        });
        let handle = BufferHandle(key.data().as_ffi());
        log::trace!(
            "created {:?} buffer {} ({} bytes)",
            desc.usage,
            handle.0,
            desc.size
        );
        Ok(handle)
    }

    fn update_buffer(&mut self, buffer: BufferHandle, data: &[u8]) -> RenderResult<()> {
        self.require_scope("update_buffer")?;
        let record = self.buffer_mut(buffer)?;
        if data.len() > record.contents.len() {
            return Err(RenderError::UploadFailed(format!(
                "{} bytes into a {}-byte buffer",
                data.len(),
                record.contents.len()
            )));
        }
        record.contents[..data.len()].copy_from_slice(data);
        self.journal.push(FrameOp::UpdateBuffer(buffer));
        log::trace!("updated buffer {} ({} bytes)", buffer.0, data.len());
        Ok(())
    }

    fn create_pipeline(&mut self, desc: &PipelineDescription) -> RenderResult<PipelineHandle> {
        if desc.vertex_layout.attributes.is_empty() {
            return Err(RenderError::ResourceCreationFailed(
                "pipeline needs at least one vertex attribute".to_string(),
            ));
        }
        let key = self.pipelines.insert(PipelineRecord {
            description: desc.clone(),
        });
        let handle = PipelineHandle(key.data().as_ffi());
        log::trace!("created pipeline {}", handle.0);
        Ok(handle)
    }

    fn create_resource_group(
        &mut self,
        buffers: &[BufferHandle],
    ) -> RenderResult<ResourceGroupHandle> {
        for handle in buffers {
            let record = self.buffer(*handle)?;
            if record.usage != BufferUsage::Uniform {
                return Err(RenderError::ResourceCreationFailed(format!(
                    "resource groups bind uniform buffers, buffer {} is {:?}",
                    handle.0, record.usage
                )));
            }
        }
        let key = self.groups.insert(GroupRecord {
            buffers: buffers.to_vec(),
        });
        let handle = ResourceGroupHandle(key.data().as_ffi());
        log::trace!("created resource group {}", handle.0);
        Ok(handle)
    }

    fn clear_target(&mut self, color: [f32; 4]) -> RenderResult<()> {
        self.require_scope("clear_target")?;
        self.journal.push(FrameOp::ClearTarget(color));
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: PipelineHandle) -> RenderResult<()> {
        self.require_scope("bind_pipeline")?;
        if self.pipelines.get(pipeline_key(pipeline)).is_none() {
            return Err(RenderError::InvalidHandle(format!(
                "pipeline {}",
                pipeline.0
            )));
        }
        self.bound_pipeline = Some(pipeline);
        self.journal.push(FrameOp::BindPipeline(pipeline));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferHandle) -> RenderResult<()> {
        self.require_scope("bind_vertex_buffer")?;
        let record = self.buffer(buffer)?;
        if record.usage != BufferUsage::Vertex {
            return Err(RenderError::InvalidHandle(format!(
                "buffer {} is {:?}, not a vertex buffer",
                buffer.0, record.usage
            )));
        }
        self.bound_vertex = Some(buffer);
        self.journal.push(FrameOp::BindVertexBuffer(buffer));
        Ok(())
    }

    fn bind_index_buffer(&mut self, buffer: BufferHandle) -> RenderResult<()> {
        self.require_scope("bind_index_buffer")?;
        let record = self.buffer(buffer)?;
        if record.usage != BufferUsage::Index {
            return Err(RenderError::InvalidHandle(format!(
                "buffer {} is {:?}, not an index buffer",
                buffer.0, record.usage
            )));
        }
        self.bound_index = Some(buffer);
        self.journal.push(FrameOp::BindIndexBuffer(buffer));
        Ok(())
    }

    fn bind_resource_group(&mut self, slot: u32, group: ResourceGroupHandle) -> RenderResult<()> {
        self.require_scope("bind_resource_group")?;
        if self.groups.get(group_key(group)).is_none() {
            return Err(RenderError::InvalidHandle(format!(
                "resource group {}",
                group.0
            )));
        }
        self.journal.push(FrameOp::BindResourceGroup(slot, group));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32) -> RenderResult<()> {
        self.require_scope("draw_indexed")?;
        if self.bound_pipeline.is_none() {
            return Err(RenderError::CommandScopeViolation(
                "draw_indexed with no pipeline bound".to_string(),
            ));
        }
        if self.bound_vertex.is_none() {
            return Err(RenderError::CommandScopeViolation(
                "draw_indexed with no vertex buffer bound".to_string(),
            ));
        }
        let Some(index_buffer) = self.bound_index else {
            return Err(RenderError::CommandScopeViolation(
                "draw_indexed with no index buffer bound".to_string(),
            ));
        };

        let record = self.buffer(index_buffer)?;
        let available = record.contents.len() / std::mem::size_of::<u16>();
        if index_count as usize > available {
            return Err(RenderError::SubmissionFailed(format!(
                "draw_indexed reads {index_count} indices from a buffer holding {available}"
            )));
        }

        self.journal.push(FrameOp::DrawIndexed(index_count));
        log::trace!("draw_indexed({index_count})");
        Ok(())
    }

    fn projection_buffer(&self) -> BufferHandle {
        self.projection_buffer
    }

    fn view_buffer(&self) -> BufferHandle {
        self.view_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::vertex::Vertex;

    fn recording_context() -> HeadlessContext {
        let mut ctx = HeadlessContext::new(640, 480);
        ctx.begin_commands().unwrap();
        ctx
    }

    #[test]
    fn test_context_owns_the_camera_uniform_buffers() {
        let ctx = HeadlessContext::new(640, 480);
        assert_eq!(ctx.buffer_count(), 2);
        assert_ne!(ctx.projection_buffer(), ctx.view_buffer());
        assert_eq!(
            ctx.buffer_contents(ctx.projection_buffer()).unwrap().len(),
            MATRIX_SIZE as usize
        );
        assert_eq!(ctx.window_size(), (640, 480));
    }

    #[test]
    fn test_nested_begin_is_rejected() {
        let mut ctx = recording_context();
        let err = ctx.begin_commands().unwrap_err();
        assert!(matches!(err, RenderError::CommandScopeViolation(_)));
    }

    #[test]
    fn test_end_without_begin_is_rejected() {
        let mut ctx = HeadlessContext::new(640, 480);
        let err = ctx.end_commands().unwrap_err();
        assert!(matches!(err, RenderError::CommandScopeViolation(_)));
    }

    #[test]
    fn test_frame_ops_outside_scope_are_rejected() {
        let mut ctx = HeadlessContext::new(640, 480);
        let view = ctx.view_buffer();

        assert!(matches!(
            ctx.update_buffer(view, &[0; 4]),
            Err(RenderError::CommandScopeViolation(_))
        ));
        assert!(matches!(
            ctx.clear_target([0.0; 4]),
            Err(RenderError::CommandScopeViolation(_))
        ));
        assert!(matches!(
            ctx.draw_indexed(3),
            Err(RenderError::CommandScopeViolation(_))
        ));
    }

    #[test]
    fn test_submit_and_present_require_a_closed_scope() {
        let mut ctx = recording_context();
        assert!(matches!(
            ctx.submit_commands(),
            Err(RenderError::CommandScopeViolation(_))
        ));
        assert!(matches!(
            ctx.present(),
            Err(RenderError::CommandScopeViolation(_))
        ));
        assert_eq!(ctx.frames_presented(), 0);
    }

    #[test]
    fn test_unknown_handles_are_rejected() {
        let mut ctx = recording_context();
        assert!(matches!(
            ctx.update_buffer(BufferHandle(u64::MAX), &[0; 4]),
            Err(RenderError::InvalidHandle(_))
        ));
        assert!(matches!(
            ctx.bind_pipeline(PipelineHandle(u64::MAX)),
            Err(RenderError::InvalidHandle(_))
        ));
        assert!(matches!(
            ctx.bind_resource_group(0, ResourceGroupHandle(u64::MAX)),
            Err(RenderError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_zero_size_buffer_is_rejected() {
        let mut ctx = HeadlessContext::new(640, 480);
        let err = ctx
            .create_buffer(&BufferDescription::vertex(0))
            .unwrap_err();
        assert!(matches!(err, RenderError::ResourceCreationFailed(_)));
    }

    #[test]
    fn test_upload_larger_than_the_buffer_is_rejected() {
        let mut ctx = HeadlessContext::new(640, 480);
        let small = ctx.create_buffer(&BufferDescription::uniform(4)).unwrap();
        ctx.begin_commands().unwrap();

        let err = ctx.update_buffer(small, &[0; 8]).unwrap_err();
        assert!(matches!(err, RenderError::UploadFailed(_)));
        // the buffer is untouched
        ctx.end_commands().unwrap();
        assert_eq!(ctx.buffer_contents(small).unwrap(), &[0; 4]);
    }

    #[test]
    fn test_resource_groups_only_accept_uniform_buffers() {
        let mut ctx = HeadlessContext::new(640, 480);
        let vertex = ctx.create_buffer(&BufferDescription::vertex(96)).unwrap();

        let err = ctx.create_resource_group(&[vertex]).unwrap_err();
        assert!(matches!(err, RenderError::ResourceCreationFailed(_)));
        assert_eq!(ctx.group_count(), 0);
    }

    #[test]
    fn test_resource_groups_keep_declaration_order() {
        let mut ctx = HeadlessContext::new(640, 480);
        let projection = ctx.projection_buffer();
        let view = ctx.view_buffer();

        let group = ctx.create_resource_group(&[projection, view]).unwrap();
        assert_eq!(ctx.group_buffers(group).unwrap(), &[projection, view]);
    }

    #[test]
    fn test_pipeline_round_trips_its_description() {
        let mut ctx = HeadlessContext::new(640, 480);
        let desc = PipelineDescription::unlit(Vertex::layout());
        let pipeline = ctx.create_pipeline(&desc).unwrap();

        assert_eq!(ctx.pipeline_description(pipeline), Some(&desc));
        assert_eq!(ctx.pipeline_count(), 1);
    }

    #[test]
    fn test_buffer_kind_is_checked_at_bind_time() {
        let mut ctx = HeadlessContext::new(640, 480);
        let uniform = ctx.create_buffer(&BufferDescription::uniform(64)).unwrap();
        ctx.begin_commands().unwrap();

        assert!(matches!(
            ctx.bind_vertex_buffer(uniform),
            Err(RenderError::InvalidHandle(_))
        ));
        assert!(matches!(
            ctx.bind_index_buffer(uniform),
            Err(RenderError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_draw_requires_pipeline_and_geometry_bindings() {
        let mut ctx = recording_context();
        let err = ctx.draw_indexed(3).unwrap_err();
        assert!(matches!(err, RenderError::CommandScopeViolation(_)));
    }

    #[test]
    fn test_draw_cannot_read_past_the_index_buffer() {
        let mut ctx = HeadlessContext::new(640, 480);
        let pipeline = ctx
            .create_pipeline(&PipelineDescription::unlit(Vertex::layout()))
            .unwrap();
        let vertex = ctx.create_buffer(&BufferDescription::vertex(84)).unwrap();
        let index = ctx.create_buffer(&BufferDescription::index(4)).unwrap();

        ctx.begin_commands().unwrap();
        ctx.bind_pipeline(pipeline).unwrap();
        ctx.bind_vertex_buffer(vertex).unwrap();
        ctx.bind_index_buffer(index).unwrap();

        assert!(ctx.draw_indexed(2).is_ok());
        let err = ctx.draw_indexed(3).unwrap_err();
        assert!(matches!(err, RenderError::SubmissionFailed(_)));
    }

    #[test]
    fn test_bindings_reset_when_a_new_scope_opens() {
        let mut ctx = HeadlessContext::new(640, 480);
        let pipeline = ctx
            .create_pipeline(&PipelineDescription::unlit(Vertex::layout()))
            .unwrap();
        let vertex = ctx.create_buffer(&BufferDescription::vertex(84)).unwrap();
        let index = ctx.create_buffer(&BufferDescription::index(6)).unwrap();

        ctx.begin_commands().unwrap();
        ctx.bind_pipeline(pipeline).unwrap();
        ctx.bind_vertex_buffer(vertex).unwrap();
        ctx.bind_index_buffer(index).unwrap();
        ctx.draw_indexed(3).unwrap();
        ctx.end_commands().unwrap();

        ctx.begin_commands().unwrap();
        let err = ctx.draw_indexed(3).unwrap_err();
        assert!(matches!(err, RenderError::CommandScopeViolation(_)));
    }

    #[test]
    fn test_journal_covers_only_the_latest_scope() {
        let mut ctx = HeadlessContext::new(640, 480);
        ctx.begin_commands().unwrap();
        ctx.clear_target([1.0, 0.0, 0.0, 1.0]).unwrap();
        ctx.end_commands().unwrap();

        ctx.begin_commands().unwrap();
        ctx.clear_target([0.0, 1.0, 0.0, 1.0]).unwrap();
        ctx.end_commands().unwrap();

        assert_eq!(
            ctx.journal(),
            &[
                FrameOp::BeginCommands,
                FrameOp::ClearTarget([0.0, 1.0, 0.0, 1.0]),
                FrameOp::EndCommands,
            ]
        );
    }

    #[test]
    fn test_present_counts_frames() {
        let mut ctx = HeadlessContext::new(640, 480);
        for _ in 0..3 {
            ctx.begin_commands().unwrap();
            ctx.clear_target([0.0; 4]).unwrap();
            ctx.end_commands().unwrap();
            ctx.submit_commands().unwrap();
            ctx.wait_idle().unwrap();
            ctx.present().unwrap();
        }
        assert_eq!(ctx.frames_presented(), 3);
    }
}
