//! Little-endian byte buffer with fixed-width string support.

/// A growing output buffer for DCM records.
///
/// Knows nothing about DCM itself, only how to lay scalars and padded
/// strings down in little-endian order.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32s(&mut self, values: &[f32]) {
        for &v in values {
            self.write_f32(v);
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write `s` into a field of exactly `width` bytes.
    ///
    /// The text is truncated to `width - 1` bytes so the field always ends in
    /// at least one NUL. Non-ASCII characters are written as `?`.
    pub fn write_fixed_str(&mut self, s: &str, width: usize) {
        if width == 0 {
            return;
        }
        let start = self.buf.len();
        self.buf.extend(
            s.chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .take(width - 1),
        );
        self.buf.resize(start + width, 0);
    }
}
