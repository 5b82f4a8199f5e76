//! Sprite draw state
//!
//! Same frame sequence as the title menu, different geometry: a colored quad
//! turning about the Y axis instead of the menu triangle.

use crate::config::CameraSettings;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::game_state::{GameState, Transition};
use crate::render::{Camera, FrameResources, RenderResult, RendererContext, Vertex};

/// Clear color behind the sprite
const BACKGROUND: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
/// Turn rate in radians per second
const ROTATION_SPEED: f32 = std::f32::consts::PI / 8.0;

const VERTICES: [Vertex; 4] = [
    Vertex::new([-0.5, -0.5, 0.0], [1.0, 0.8, 0.0, 1.0]),
    Vertex::new([0.5, -0.5, 0.0], [0.0, 0.8, 1.0, 1.0]),
    Vertex::new([0.5, 0.5, 0.0], [1.0, 0.0, 0.8, 1.0]),
    Vertex::new([-0.5, 0.5, 0.0], [1.0, 1.0, 1.0, 1.0]),
];
const INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Sprite state drawing a quad from two triangles
pub struct SpriteDrawState {
    camera: Camera,
    resources: FrameResources,
    rotation: f32,
}

impl SpriteDrawState {
    /// Create the sprite state and upload its draw resources
    pub fn new(ctx: &mut dyn RendererContext, settings: &CameraSettings) -> RenderResult<Self> {
        let (width, height) = ctx.window_size();
        let camera = Camera::perspective(
            Vec3::new(0.0, 0.0, 3.0),
            settings.fov_degrees,
            width as f32,
            height as f32,
            settings.near,
            settings.far,
        );
        let resources = FrameResources::create(ctx, &VERTICES, &INDICES)?;
        log::info!("sprite draw resources ready");

        Ok(Self {
            camera,
            resources,
            rotation: 0.0,
        })
    }

    /// Current turn angle in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

impl GameState for SpriteDrawState {
    fn update(&mut self, elapsed: f32) -> Transition {
        self.rotation += ROTATION_SPEED * elapsed;
        Transition::Stay
    }

    fn render(&mut self, ctx: &mut dyn RendererContext) -> RenderResult<()> {
        let model = Mat4::rotation_y(self.rotation);
        self.resources.draw(ctx, &mut self.camera, &model, BACKGROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FrameOp, HeadlessContext};
    use crate::states::TitleMenuState;

    #[test]
    fn test_sprite_draws_its_quad() {
        let mut ctx = HeadlessContext::new(1024, 768);
        let mut sprite = SpriteDrawState::new(&mut ctx, &CameraSettings::default()).unwrap();

        sprite.render(&mut ctx).unwrap();

        assert!(ctx
            .journal()
            .iter()
            .any(|op| matches!(op, FrameOp::DrawIndexed(6))));
        assert_eq!(ctx.frames_presented(), 1);
    }

    #[test]
    fn test_sprite_turns_about_the_y_axis() {
        let mut ctx = HeadlessContext::new(1024, 768);
        let mut sprite = SpriteDrawState::new(&mut ctx, &CameraSettings::default()).unwrap();

        sprite.update(4.0);
        sprite.render(&mut ctx).unwrap();

        let model_handle = match ctx.journal() {
            [FrameOp::BeginCommands, FrameOp::UpdateBuffer(_), FrameOp::UpdateBuffer(_), FrameOp::UpdateBuffer(model), ..] => {
                *model
            }
            other => panic!("unexpected frame journal: {other:?}"),
        };

        let expected = Mat4::rotation_y(sprite.rotation());
        assert_eq!(
            ctx.buffer_contents(model_handle).unwrap(),
            bytemuck::cast_slice::<f32, u8>(expected.as_slice())
        );
    }

    #[test]
    fn test_drawing_states_share_the_context_without_leaks() {
        let mut ctx = HeadlessContext::new(1024, 768);
        let settings = CameraSettings::default();
        let mut menu = TitleMenuState::new(&mut ctx, &settings).unwrap();
        let mut sprite = SpriteDrawState::new(&mut ctx, &settings).unwrap();

        // two camera buffers plus three per drawing state
        assert_eq!(ctx.buffer_count(), 8);
        assert_eq!(ctx.pipeline_count(), 2);
        assert_eq!(ctx.group_count(), 4);

        for _ in 0..2 {
            menu.render(&mut ctx).unwrap();
            sprite.render(&mut ctx).unwrap();
        }

        // rendering allocates nothing
        assert_eq!(ctx.buffer_count(), 8);
        assert_eq!(ctx.pipeline_count(), 2);
        assert_eq!(ctx.group_count(), 4);
        assert_eq!(ctx.frames_presented(), 4);
    }
}
