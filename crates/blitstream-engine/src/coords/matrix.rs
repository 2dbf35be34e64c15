use bytemuck::{Pod, Zeroable};

/// Column-major 4x4 matrix.
///
/// Only what the frame pipeline needs: a perspective projection targeting
/// wgpu clip space (z in [0, 1], +Y up), a translation, and multiplication.
/// The layout matches WGSL `mat4x4<f32>` so the matrix can be written to a
/// uniform buffer directly.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Right-handed perspective projection with depth mapped to [0, 1].
    pub fn perspective(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y_deg.to_radians() * 0.5).tan();
        let k = far / (near - far);
        Mat4 {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, k, -1.0],
                [0.0, 0.0, near * k, 0.0],
            ],
        }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Mat4::IDENTITY;
        m.cols[3] = [x, y, z, 1.0];
        m
    }

    /// Applies the matrix to a homogeneous point.
    pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (c, col) in self.cols.iter().enumerate() {
            for r in 0..4 {
                out[r] += col[r] * v[c];
            }
        }
        out
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4 { cols: [[0.0; 4]; 4] };
        for c in 0..4 {
            out.cols[c] = self.transform(rhs.cols[c]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identity_is_neutral() {
        let m = Mat4::perspective(45.0, 1.5, 0.01, 100.0);
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
    }

    #[test]
    fn translation_moves_points() {
        let t = Mat4::translation(1.0, -2.0, 3.0);
        let p = t.transform([0.0, 0.0, 0.0, 1.0]);
        assert_eq!(p, [1.0, -2.0, 3.0, 1.0]);
    }

    #[test]
    fn perspective_maps_near_plane_to_zero_depth() {
        let (near, far) = (0.01, 100.0);
        let m = Mat4::perspective(45.0, 1.0, near, far);

        let p = m.transform([0.0, 0.0, -near, 1.0]);
        assert!(approx(p[2] / p[3], 0.0));

        let p = m.transform([0.0, 0.0, -far, 1.0]);
        assert!(approx(p[2] / p[3], 1.0));
    }

    #[test]
    fn mul_composes_right_to_left() {
        // translate-then-project equals projecting a pre-translated point
        let proj = Mat4::perspective(45.0, 1.0, 0.1, 10.0);
        let view = Mat4::translation(0.0, 0.0, -4.0);
        let mvp = proj * view;

        let a = mvp.transform([0.5, 0.5, 0.0, 1.0]);
        let b = proj.transform(view.transform([0.5, 0.5, 0.0, 1.0]));
        for i in 0..4 {
            assert!(approx(a[i], b[i]));
        }
    }
}
