//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics and game development.

pub use nalgebra::{Matrix4, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a perspective projection matrix
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // Right-handed projection looking down -Z, depth mapped to [0, 1].
        // Matches the convention the uniform-consuming shaders expect.
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (near - far);
        result[(2, 3)] = (near * far) / (near - far);
        result[(3, 2)] = -1.0;

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        // Right-handed view basis: camera looks along -Z in view space.
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        Mat4::new(
            right.x, right.y, right.z, -right.dot(&eye),
            camera_up.x, camera_up.y, camera_up.z, -camera_up.dot(&eye),
            -forward.x, -forward.y, -forward.z, forward.dot(&eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_perspective_depth_range() {
        let near = 1.0;
        let far = 101.0;
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, near, far);

        // A point on the near plane lands at depth 0, the far plane at depth 1.
        let near_clip = proj * Vec4::new(0.0, 0.0, -near, 1.0);
        let far_clip = proj * Vec4::new(0.0, 0.0, -far, 1.0);

        assert_relative_eq!(near_clip.z / near_clip.w, 0.0, epsilon = EPSILON);
        assert_relative_eq!(far_clip.z / far_clip.w, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_scales_with_fov() {
        // A 90 degree vertical field of view gives a unit focal length.
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_2, 2.0, 0.1, 100.0);
        assert_relative_eq!(proj[(1, 1)], 1.0, epsilon = EPSILON);
        assert_relative_eq!(proj[(0, 0)], 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_centers_eye() {
        let eye = Vec3::new(4.0, 3.0, 3.0);
        let view = Mat4::look_at(eye, Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));

        let eye_in_view = view * Vec4::new(eye.x, eye.y, eye.z, 1.0);
        assert_relative_eq!(eye_in_view.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(eye_in_view.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(eye_in_view.z, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_target_lies_on_negative_z() {
        let eye = Vec3::new(0.0, 0.0, 3.0);
        let view = Mat4::look_at(eye, Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));

        let target_in_view = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(target_in_view.z, -3.0, epsilon = EPSILON);
    }

    #[test]
    fn test_deg_to_rad_round_trip() {
        assert_relative_eq!(utils::deg_to_rad(45.0), std::f32::consts::FRAC_PI_4, epsilon = EPSILON);
        assert_relative_eq!(utils::rad_to_deg(utils::deg_to_rad(123.0)), 123.0, epsilon = 1e-4);
    }
}
