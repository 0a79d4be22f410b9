use nalgebra as na;
use na::{matrix, vector, Matrix4, Vector3, Vector4};

/// Transformation of a point to homogenous coordinates.
pub fn to_hom_point(v: Vector3<f32>) -> Vector4<f32> {
    return vector![v.x, v.y, v.z, 1.0];
}

/// Transformation of a direction to homogenous coordinates.
pub fn to_hom_vector(v: Vector3<f32>) -> Vector4<f32> {
    return vector![v.x, v.y, v.z, 0.0];
}

/// Perspective divide of a clip-space coordinate.
pub fn from_hom_point(v: Vector4<f32>) -> Vector3<f32> {
    return vector![v.x / v.w, v.y / v.w, v.z / v.w];
}

/// Drops the w component without dividing.
pub fn from_hom_vector(v: Vector4<f32>) -> Vector3<f32> {
    return vector![v.x, v.y, v.z];
}

/// Unit vector in the direction of `v`, or the zero vector when `v` has no length.
// nalgebra's normalize() would give NaNs here, the pipeline relies on getting zero back.
pub fn normalize(v: Vector3<f32>) -> Vector3<f32> {
    let magnitude = v.norm();
    if magnitude == 0.0 {
        return Vector3::zeros();
    }
    return v / magnitude;
}

/// Clamps `value` into `[min, max]`.
pub fn clamp(min: f32, max: f32, value: f32) -> f32 {
    if value < min {
        return min;
    }
    if value > max {
        return max;
    }
    return value;
}

pub fn to_radians(degrees: f32) -> f32 {
    return degrees.to_radians();
}

pub fn identity() -> Matrix4<f32> {
    return Matrix4::identity();
}

pub fn translate(t: Vector3<f32>) -> Matrix4<f32> {
    return Matrix4::new_translation(&t);
}

/// Uniform scale.
pub fn scale(s: f32) -> Matrix4<f32> {
    return Matrix4::new_scaling(s);
}

/// Rotation around the x axis (pitch).
pub fn rotate_x(angle_radians: f32) -> Matrix4<f32> {
    let c = angle_radians.cos();
    let s = angle_radians.sin();
    return matrix![1.0, 0.0, 0.0, 0.0;
                   0.0, c,   -s,  0.0;
                   0.0, s,   c,   0.0;
                   0.0, 0.0, 0.0, 1.0];
}

/// Rotation around the y axis (yaw).
pub fn rotate_y(angle_radians: f32) -> Matrix4<f32> {
    let c = angle_radians.cos();
    let s = angle_radians.sin();
    return matrix![c,   0.0, s,   0.0;
                   0.0, 1.0, 0.0, 0.0;
                   -s,  0.0, c,   0.0;
                   0.0, 0.0, 0.0, 1.0];
}

/// OpenGL style frustum projection, mapping the view volume to the [-1, 1] cube with w = -z_eye.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    return matrix![
        (near * 2.0) / (right - left), 0.0,                           (right + left) / (right - left), 0.0;
        0.0,                           (near * 2.0) / (top - bottom), (top + bottom) / (top - bottom), 0.0;
        0.0,                           0.0,                           -(far + near) / (far - near),    -(far * near * 2.0) / (far - near);
        0.0,                           0.0,                           -1.0,                            0.0
    ];
}

/// Symmetric frustum built from a vertical field of view (radians) and aspect ratio.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let top = near * (fov_y / 2.0).tan();
    let right = top * aspect;
    return frustum(-right, right, -top, top, near, far);
}

/// General 4x4 inverse. `None` when the determinant is exactly zero.
pub fn invert(m: &Matrix4<f32>) -> Option<Matrix4<f32>> {
    return m.try_inverse();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    #[test]
    fn normalize_keeps_zero_vector() {
        assert_eq!(normalize(Vector3::zeros()), Vector3::zeros());
        let n = normalize(vector![3.0, 0.0, 4.0]);
        assert_close(n.x, 0.6);
        assert_close(n.z, 0.8);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(0.0, 1.0, -2.0), 0.0);
        assert_eq!(clamp(0.0, 1.0, 2.0), 1.0);
        assert_eq!(clamp(0.0, 1.0, 0.25), 0.25);
    }

    #[test]
    fn translation_lives_in_last_column() {
        let m = translate(vector![1.0, 2.0, 3.0]);
        let p = m * to_hom_point(vector![0.0, 0.0, 0.0]);
        assert_eq!(from_hom_point(p), vector![1.0, 2.0, 3.0]);
        // Directions are unaffected by translation.
        let d = m * to_hom_vector(vector![0.0, 1.0, 0.0]);
        assert_eq!(from_hom_vector(d), vector![0.0, 1.0, 0.0]);
    }

    #[test]
    fn rotations_match_right_handed_convention() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        let y = from_hom_vector(rotate_x(half_pi) * to_hom_vector(vector![0.0, 1.0, 0.0]));
        assert_close(y.z, 1.0);
        let x = from_hom_vector(rotate_y(half_pi) * to_hom_vector(vector![1.0, 0.0, 0.0]));
        assert_close(x.z, -1.0);
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let proj = perspective(to_radians(60.0), 1.0, 0.5, 10.0);
        let near = from_hom_point(proj * to_hom_point(vector![0.0, 0.0, -0.5]));
        let far = from_hom_point(proj * to_hom_point(vector![0.0, 0.0, -10.0]));
        assert_close(near.z, -1.0);
        assert_close(far.z, 1.0);
        assert_close((proj * to_hom_point(vector![0.0, 0.0, -2.0])).w, 2.0);
    }

    #[test]
    fn invert_recovers_translation() {
        let view = translate(vector![-1.0, -2.0, -3.0]);
        let inverted = invert(&view).unwrap();
        assert_close(inverted[(0, 3)], 1.0);
        assert_close(inverted[(1, 3)], 2.0);
        assert_close(inverted[(2, 3)], 3.0);
    }

    #[test]
    fn invert_rejects_singular_matrix() {
        assert!(invert(&Matrix4::zeros()).is_none());
        assert!(invert(&scale(0.0)).is_none());
    }
}
