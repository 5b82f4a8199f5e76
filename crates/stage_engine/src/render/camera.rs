//! Camera with cached view and projection matrices
//!
//! Both matrices are plain state: they are recomputed at the mutation that
//! affects them and never during rendering. Accessors are pure, so a frame
//! can read them any number of times at no cost.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Default vertical field of view in degrees
const DEFAULT_FOV_DEGREES: f32 = 45.0;
/// Default near clip distance
const DEFAULT_NEAR: f32 = 0.1;
/// Default far clip distance
const DEFAULT_FAR: f32 = 1000.0;

/// Perspective camera owned by a single state
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    fov_y: f32,
    near: f32,
    far: f32,
    viewport: (f32, f32),
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Create a camera with default placement for the given viewport
    ///
    /// Positioned at (4, 3, 3) looking at the origin with a 45 degree
    /// vertical field of view and a 0.1 .. 1000 clip range.
    pub fn new(width: f32, height: f32) -> Self {
        Self::perspective(
            Vec3::new(4.0, 3.0, 3.0),
            DEFAULT_FOV_DEGREES,
            width,
            height,
            DEFAULT_NEAR,
            DEFAULT_FAR,
        )
    }

    /// Create a camera at `position` looking at the origin
    ///
    /// `fov_degrees` is converted to radians once, here; everything after
    /// construction works in radians.
    pub fn perspective(
        position: Vec3,
        fov_degrees: f32,
        width: f32,
        height: f32,
        near: f32,
        far: f32,
    ) -> Self {
        debug_assert!(
            width > 0.0 && height > 0.0,
            "camera viewport must have positive extent"
        );
        let fov_y = utils::deg_to_rad(fov_degrees);
        let target = Vec3::zeros();
        let up = Vec3::new(0.0, 1.0, 0.0);
        Self {
            position,
            target,
            up,
            fov_y,
            near,
            far,
            viewport: (width, height),
            view_matrix: Mat4::look_at(position, target, up),
            projection_matrix: Mat4::perspective(fov_y, width / height, near, far),
        }
    }

    /// Move the camera, recomputing only the view matrix
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_view();
    }

    /// Aim the camera at a new target, recomputing only the view matrix
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.update_view();
    }

    /// Adopt a new viewport size, recomputing only the projection matrix
    pub fn viewport_resized(&mut self, width: f32, height: f32) {
        debug_assert!(
            width > 0.0 && height > 0.0,
            "camera viewport must have positive extent"
        );
        self.viewport = (width, height);
        self.update_projection();
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Viewport size the projection matrix was computed for
    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Width over height of the current viewport
    pub fn aspect_ratio(&self) -> f32 {
        self.viewport.0 / self.viewport.1
    }

    /// Cached view matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Cached projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    fn update_view(&mut self) {
        self.view_matrix = Mat4::look_at(self.position, self.target, self.up);
    }

    fn update_projection(&mut self) {
        self.projection_matrix =
            Mat4::perspective(self.fov_y, self.aspect_ratio(), self.near, self.far);
    }
}
