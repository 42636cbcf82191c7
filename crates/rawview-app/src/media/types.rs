use std::path::Path;

use serde::{Deserialize, Serialize};

/// Raw pixel layouts understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Y plane, then U and V planes at half resolution in both axes.
    Yuv420Planar,
    /// One byte triplet per pixel, row-major.
    Rgb24Interleaved,
}

impl PixelFormat {
    /// Pick the layout from the file name. Only `.yuv` selects planar 4:2:0.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if ext == "yuv" {
            PixelFormat::Yuv420Planar
        } else {
            PixelFormat::Rgb24Interleaved
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PixelFormat::Yuv420Planar => "YUV 4:2:0",
            PixelFormat::Rgb24Interleaved => "RGB24",
        }
    }
}

/// Byte order of the three channels inside an interleaved RGB24 file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Externally supplied geometry of a headerless video file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

impl Geometry {
    pub fn new(width: u32, height: u32, frame_rate: f64) -> Self {
        Self {
            width,
            height,
            frame_rate,
        }
    }
}

/// A decoded frame ready for display: `height * width` RGB8 triplets, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
impl DecodedFrame {
    /// RGB triplet at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}
