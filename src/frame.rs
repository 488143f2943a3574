//! Video frame types and pixel format conversions.

use bytemuck::{Pod, Zeroable};

/// Supported pixel formats for video frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// RGB with 8 bits per channel (24 bits per pixel)
    Rgb,
    /// RGBA with 8 bits per channel (32 bits per pixel)
    Rgba,
    /// BGRA with 8 bits per channel (32 bits per pixel), the layout many
    /// platform capture stacks hand out natively
    Bgra,
}

impl PixelFormat {
    /// Returns the number of bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba | PixelFormat::Bgra => 4,
        }
    }
}

/// A video frame containing image data.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format of the frame data
    pub format: PixelFormat,
    /// Capture timestamp in microseconds (if available)
    pub timestamp_us: Option<u64>,
    /// Raw pixel data
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Creates a new zeroed video frame with the given dimensions and format.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let size = (width as usize) * (height as usize) * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            timestamp_us: None,
            data: vec![0; size],
        }
    }

    /// Creates a video frame from existing data.
    pub fn from_data(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            timestamp_us: None,
            data,
        }
    }

    /// Converts this frame to RGBA format.
    pub fn to_rgba(&self) -> VideoFrame {
        if self.format == PixelFormat::Rgba {
            return self.clone();
        }

        let pixel_count = (self.width as usize) * (self.height as usize);
        let mut rgba_data = vec![0u8; pixel_count * 4];

        match self.format {
            PixelFormat::Rgb => {
                for i in 0..pixel_count {
                    rgba_data[i * 4] = self.data[i * 3];
                    rgba_data[i * 4 + 1] = self.data[i * 3 + 1];
                    rgba_data[i * 4 + 2] = self.data[i * 3 + 2];
                    rgba_data[i * 4 + 3] = 255;
                }
            }
            PixelFormat::Bgra => {
                // Channel swizzle, alpha carried through.
                for i in 0..pixel_count {
                    rgba_data[i * 4] = self.data[i * 4 + 2];
                    rgba_data[i * 4 + 1] = self.data[i * 4 + 1];
                    rgba_data[i * 4 + 2] = self.data[i * 4];
                    rgba_data[i * 4 + 3] = self.data[i * 4 + 3];
                }
            }
            PixelFormat::Rgba => unreachable!(),
        }

        VideoFrame {
            width: self.width,
            height: self.height,
            format: PixelFormat::Rgba,
            timestamp_us: self.timestamp_us,
            data: rgba_data,
        }
    }
}

/// Vertex for rendering a full-screen quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    /// Vertices for a full-screen quad.
    pub const VERTICES: &'static [QuadVertex] = &[
        QuadVertex { position: [-1.0, -1.0], tex_coords: [0.0, 1.0] },
        QuadVertex { position: [1.0, -1.0], tex_coords: [1.0, 1.0] },
        QuadVertex { position: [1.0, 1.0], tex_coords: [1.0, 0.0] },
        QuadVertex { position: [-1.0, 1.0], tex_coords: [0.0, 0.0] },
    ];

    /// Indices for the quad (two triangles).
    pub const INDICES: &'static [u16] = &[0, 1, 2, 2, 3, 0];

    /// Returns the vertex buffer layout.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_to_rgba_adds_opaque_alpha() {
        let rgb_data = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let frame = VideoFrame::from_data(2, 2, PixelFormat::Rgb, rgb_data);
        let rgba = frame.to_rgba();

        assert_eq!(rgba.format, PixelFormat::Rgba);
        assert_eq!(rgba.data.len(), 16);
        assert_eq!(&rgba.data[0..4], &[255, 0, 0, 255]);
        assert_eq!(&rgba.data[4..8], &[0, 255, 0, 255]);
    }

    #[test]
    fn bgra_to_rgba_swaps_channels() {
        let bgra_data = vec![0, 0, 255, 255, 255, 0, 0, 128];
        let frame = VideoFrame::from_data(2, 1, PixelFormat::Bgra, bgra_data);
        let rgba = frame.to_rgba();

        assert_eq!(rgba.format, PixelFormat::Rgba);
        // BGRA (0,0,255,255) is red
        assert_eq!(&rgba.data[0..4], &[255, 0, 0, 255]);
        // BGRA (255,0,0,128) is half-transparent blue
        assert_eq!(&rgba.data[4..8], &[0, 0, 255, 128]);
    }

    #[test]
    fn rgba_passthrough_keeps_data() {
        let mut frame = VideoFrame::new(2, 2, PixelFormat::Rgba);
        frame.timestamp_us = Some(42);
        let rgba = frame.to_rgba();
        assert_eq!(rgba.data, frame.data);
        assert_eq!(rgba.timestamp_us, Some(42));
    }
}
