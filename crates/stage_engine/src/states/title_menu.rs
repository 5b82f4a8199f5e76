//! Title menu state
//!
//! Draws the menu's rotating triangle. Geometry lives on the device from
//! construction on; per frame only the model matrix changes.

use crate::config::CameraSettings;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::game_state::{GameState, Transition};
use crate::render::{Camera, FrameResources, RenderResult, RendererContext, Vertex};

/// Clear color behind the menu
const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Spin rate in radians per second
const ROTATION_SPEED: f32 = std::f32::consts::PI / 4.0;

const VERTICES: [Vertex; 3] = [
    Vertex::new([-0.5, 0.0, 0.0], [1.0, 0.0, 0.0, 0.5]),
    Vertex::new([0.5, 0.0, 0.0], [0.0, 1.0, 0.0, 0.5]),
    Vertex::new([0.0, 0.5, 0.0], [0.0, 0.0, 1.0, 0.5]),
];
const INDICES: [u16; 3] = [0, 1, 2];

/// Menu state with a triangle spinning in the view plane
pub struct TitleMenuState {
    camera: Camera,
    resources: FrameResources,
    rotation: f32,
}

impl TitleMenuState {
    /// Create the menu and upload its draw resources
    ///
    /// Runs one synchronous setup pass against `ctx`; when this returns the
    /// triangle is device-resident and the first frame can draw immediately.
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
        log::info!("title menu resources ready");

        Ok(Self {
            camera,
            resources,
            rotation: 0.0,
        })
    }

    /// Current spin angle in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

impl GameState for TitleMenuState {
    fn update(&mut self, elapsed: f32) -> Transition {
        self.rotation += ROTATION_SPEED * elapsed;
        Transition::Stay
    }

    fn render(&mut self, ctx: &mut dyn RendererContext) -> RenderResult<()> {
        let model = Mat4::rotation_z(self.rotation);
        self.resources.draw(ctx, &mut self.camera, &model, BACKGROUND)
    }
}
