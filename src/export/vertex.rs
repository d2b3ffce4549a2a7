//! Vertex record encoding.
//!
//! ```text
//! 0x00: position f32 x3
//! 0x0C: uv       f32 x2
//! 0x14: color    u8 x4 (RGBA)
//! 0x18: normal   f32 x3
//! ```

use super::deindex::ExpandedVertex;
use crate::format::ByteWriter;
use crate::types::Color;

/// Size of one encoded vertex in bytes.
pub const VERTEX_SIZE: usize = 36;

/// Quantize a float color channel to a byte: scale, clamp, round to nearest.
pub fn quantize_channel(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0).round() as u8
}

pub fn quantize_color(color: Color) -> [u8; 4] {
    color.map(quantize_channel)
}

pub fn write_vertex(w: &mut ByteWriter, vertex: &ExpandedVertex) {
    w.write_f32s(&vertex.position);
    w.write_f32s(&vertex.uv);
    w.write_bytes(&quantize_color(vertex.color));
    w.write_f32s(&vertex.normal);
}

pub fn write_vertices(w: &mut ByteWriter, vertices: &[ExpandedVertex]) {
    for vertex in vertices {
        write_vertex(w, vertex);
    }
}
