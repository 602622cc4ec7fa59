//! Procedural geometry for the studio panels and the backdrop.
//!
//! Vertex layout, uv orientation and triangle winding match the usual three.js shapes, so
//! front faces point along the listed normal.

use std::f32::consts::PI;

use ultraviolet::Vec3;

use super::{Geometry, Vertex};

/// A 1x1 square in the xy plane, facing +z.
pub fn plane() -> Geometry {
    let mut vertices = Vec::with_capacity(4);
    for iy in 0..2 {
        for ix in 0..2 {
            vertices.push(Vertex {
                position: [ix as f32 - 0.5, -(iy as f32 - 0.5), 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [ix as f32, 1.0 - iy as f32],
            });
        }
    }

    Geometry {
        vertices,
        indices: vec![0, 2, 1, 2, 3, 1],
    }
}

/// A flat annulus in the xy plane, facing +z.
pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> Geometry {
    let theta_segments = theta_segments.max(3);
    let mut vertices = Vec::with_capacity(2 * (theta_segments as usize + 1));

    for radius in [inner_radius, outer_radius] {
        for i in 0..=theta_segments {
            let segment = i as f32 / theta_segments as f32 * 2.0 * PI;
            let (sin, cos) = segment.sin_cos();
            let (x, y) = (radius * cos, radius * sin);
            vertices.push(Vertex {
                position: [x, y, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [
                    (x / outer_radius + 1.0) / 2.0,
                    (y / outer_radius + 1.0) / 2.0,
                ],
            });
        }
    }

    let mut indices = Vec::with_capacity(theta_segments as usize * 6);
    for segment in 0..theta_segments {
        let a = segment;
        let b = segment + theta_segments + 1;
        let c = segment + theta_segments + 2;
        let d = segment + 1;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    Geometry { vertices, indices }
}

/// A uv sphere around the origin with outward normals.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row = width_segments + 1;

    let mut vertices = Vec::with_capacity((row * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let position = Vec3::new(
                -radius * (u * 2.0 * PI).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * 2.0 * PI).sin() * (v * PI).sin(),
            );
            let normal = if position.mag_sq() > 0.0 {
                position.normalized()
            } else {
                Vec3::zero()
            };
            vertices.push(Vertex {
                position: position.into(),
                normal: normal.into(),
                uv: [u, 1.0 - v],
            });
        }
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // The pole rows collapse to a point and only need one triangle per segment
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Geometry { vertices, indices }
}
