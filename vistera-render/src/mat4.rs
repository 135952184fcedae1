//! Minimal column-major 4x4 matrix helpers for text placement.
//!
//! Only what the label paths need: an orthographic screen projection,
//! world-to-screen projection of a single anchor point, and rotation
//! cancellation for viewer-facing labels.

pub type Mat4 = [f32; 16];

pub fn identity() -> Mat4 {
    let mut m = [0.0; 16];
    m[0] = 1.0;
    m[5] = 1.0;
    m[10] = 1.0;
    m[15] = 1.0;
    m
}

pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            let mut sum = 0.0;
            for k in 0..4 {
                sum += a[k * 4 + row] * b[col * 4 + k];
            }
            out[col * 4 + row] = sum;
        }
    }
    out
}

/// Screen-space projection with y growing upward from the bottom-left
/// corner, the frame all 2D text is drawn in.
pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let mut m = [0.0; 16];
    m[0] = 2.0 / (right - left);
    m[5] = 2.0 / (top - bottom);
    m[10] = -2.0 / (far - near);
    m[12] = -(right + left) / (right - left);
    m[13] = -(top + bottom) / (top - bottom);
    m[14] = -(far + near) / (far - near);
    m[15] = 1.0;
    m
}

fn transform(m: &Mat4, v: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for row in 0..4 {
        out[row] = m[row] * v[0] + m[4 + row] * v[1] + m[8 + row] * v[2] + m[12 + row] * v[3];
    }
    out
}

/// Projects a world-space point to window coordinates through the given
/// modelview and projection transforms. Returns `None` when the point
/// lands on the camera plane (w = 0) and has no screen position.
pub fn project(
    point: [f32; 3],
    modelview: &Mat4,
    projection: &Mat4,
    viewport: [i32; 4],
) -> Option<[f32; 3]> {
    let eye = transform(modelview, [point[0], point[1], point[2], 1.0]);
    let clip = transform(projection, eye);
    if clip[3] == 0.0 {
        return None;
    }
    let ndc = [clip[0] / clip[3], clip[1] / clip[3], clip[2] / clip[3]];
    Some([
        viewport[0] as f32 + viewport[2] as f32 * (ndc[0] + 1.0) / 2.0,
        viewport[1] as f32 + viewport[3] as f32 * (ndc[1] + 1.0) / 2.0,
        (ndc[2] + 1.0) / 2.0,
    ])
}

/// Replaces the rotation block with the identity, keeping translation.
/// Geometry drawn under the result always faces the viewer.
pub fn cancel_rotation(m: &Mat4) -> Mat4 {
    let mut out = identity();
    out[12] = m[12];
    out[13] = m[13];
    out[14] = m[14];
    out[15] = m[15];
    out
}
