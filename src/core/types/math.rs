//! Numeric aggregates exchanged with the target process

use bytemuck::{Pod, Zeroable};

/// Three packed `f32` components, 12 bytes, no padding
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Size of the in-memory representation
    pub const SIZE: usize = 12;

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vector3 { x, y, z }
    }

    /// Decodes three little-endian floats
    pub fn from_le_bytes(bytes: [u8; Self::SIZE]) -> Self {
        let f = |i: usize| f32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        Vector3::new(f(0), f(4), f(8))
    }
}

/// Row-major 4x4 matrix, addressed as `m[row][col]`
///
/// The in-memory layout is sixteen consecutive floats `M11, M12, .. M44`,
/// so `m[0][3]` is `M14` and `m[3][0]` is `M41`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Matrix4x4 {
    pub m: [[f32; 4]; 4],
}

impl Matrix4x4 {
    /// Size of the in-memory representation
    pub const SIZE: usize = 64;

    pub const IDENTITY: Matrix4x4 = Matrix4x4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Matrix4x4 { m }
    }

    /// Decodes sixteen little-endian floats in row-major order
    pub fn from_le_bytes(bytes: [u8; Self::SIZE]) -> Self {
        let mut m = [[0.0f32; 4]; 4];
        for (i, chunk) in bytes.chunks_exact(4).enumerate() {
            m[i / 4][i % 4] = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Matrix4x4 { m }
    }

    /// Element at `row`, `col`
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }
}
