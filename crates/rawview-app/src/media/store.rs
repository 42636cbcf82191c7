use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::decoder;
use super::error::{MediaError, MediaResult};
use super::types::{ChannelOrder, DecodedFrame, Geometry, PixelFormat};

/// Bytes occupied by one frame of the given layout.
///
/// Planar 4:2:0 needs even dimensions so both chroma planes tile the luma plane
/// in exact 2x2 blocks.
pub fn frame_size_bytes(format: PixelFormat, width: u32, height: u32) -> MediaResult<usize> {
    if width == 0 || height == 0 {
        return Err(MediaError::Configuration(format!(
            "frame dimensions must be non-zero, got {width}x{height}"
        )));
    }
    let pixels = width as usize * height as usize;
    match format {
        PixelFormat::Yuv420Planar => {
            if width % 2 != 0 || height % 2 != 0 {
                return Err(MediaError::Configuration(format!(
                    "YUV 4:2:0 requires even width and height, got {width}x{height}"
                )));
            }
            Ok(pixels * 3 / 2)
        }
        PixelFormat::Rgb24Interleaved => Ok(pixels * 3),
    }
}

/// An open headerless video file with random access to whole frames.
pub struct VideoSource {
    path: PathBuf,
    file: File,
    geometry: Geometry,
    pixel_format: PixelFormat,
    channel_order: ChannelOrder,
    frame_size: usize,
    total_frames: usize,
    current_frame: usize,
    /// At least one frame has been read since open.
    primed: bool,
    /// The file cursor sits right after `current_frame`.
    cursor_in_sync: bool,
}

impl std::fmt::Debug for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("geometry", &self.geometry)
            .field("pixel_format", &self.pixel_format)
            .field("total_frames", &self.total_frames)
            .field("current_frame", &self.current_frame)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open `path` with externally supplied geometry.
    ///
    /// The pixel layout is decided once here from the file suffix. A trailing
    /// partial frame is ignored; a file without a single complete frame is a
    /// configuration error.
    pub fn open(
        path: impl AsRef<Path>,
        geometry: Geometry,
        channel_order: ChannelOrder,
    ) -> MediaResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !geometry.frame_rate.is_finite() || geometry.frame_rate <= 0.0 {
            return Err(MediaError::Configuration(format!(
                "frame rate must be a positive number, got {}",
                geometry.frame_rate
            )));
        }

        let pixel_format = PixelFormat::from_path(&path);
        let frame_size = frame_size_bytes(pixel_format, geometry.width, geometry.height)?;

        let file = File::open(&path)?;
        let file_size = file.metadata()?.len();
        let total_frames = (file_size / frame_size as u64) as usize;
        if total_frames == 0 {
            return Err(MediaError::Configuration(format!(
                "{} is {} bytes, shorter than one {} frame of {} bytes at {}x{}",
                path.display(),
                file_size,
                pixel_format.label(),
                frame_size,
                geometry.width,
                geometry.height
            )));
        }

        log::info!(
            "Opened video file with {} frame{} ({}, {}x{} @ {} fps)",
            total_frames,
            if total_frames == 1 { "" } else { "s" },
            pixel_format.label(),
            geometry.width,
            geometry.height,
            geometry.frame_rate
        );

        Ok(Self {
            path,
            file,
            geometry,
            pixel_format,
            channel_order,
            frame_size,
            total_frames,
            current_frame: total_frames - 1,
            primed: false,
            cursor_in_sync: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_last_frame(&self) -> bool {
        self.current_frame == self.total_frames - 1
    }

    /// Index after the current one. Not clamped; `read_frame` clamps.
    pub fn next_index(&self) -> i64 {
        self.current_frame as i64 + 1
    }

    /// Index before the current one. Not clamped; may be -1.
    pub fn prev_index(&self) -> i64 {
        self.current_frame as i64 - 1
    }

    pub fn clamp_index(&self, index: i64) -> usize {
        index.clamp(0, self.total_frames as i64 - 1) as usize
    }

    /// Read the raw bytes of frame `index` (clamped into range).
    ///
    /// Returns `Ok(None)` when that frame is already current: nothing changed
    /// and the caller should not decode or redraw.
    pub fn read_frame(&mut self, index: i64) -> MediaResult<Option<Vec<u8>>> {
        let target = self.clamp_index(index);
        if self.primed && target == self.current_frame {
            log::trace!("Frame #{target} already current");
            return Ok(None);
        }

        let sequential = self.primed && self.cursor_in_sync && target == self.current_frame + 1;
        if !sequential {
            let offset = target as u64 * self.frame_size as u64;
            if let Err(e) = self.file.seek(SeekFrom::Start(offset)) {
                self.cursor_in_sync = false;
                return Err(e.into());
            }
        }

        let mut data = Vec::with_capacity(self.frame_size);
        let read = self
            .file
            .by_ref()
            .take(self.frame_size as u64)
            .read_to_end(&mut data);
        match read {
            Ok(n) if n == self.frame_size => {}
            Ok(n) => {
                self.cursor_in_sync = false;
                log::error!(
                    "Error in reading frame #{target} ({}): {n} of {} bytes available",
                    target * self.frame_size,
                    self.frame_size
                );
                return Err(MediaError::TruncatedFrame {
                    expected: self.frame_size,
                    actual: n,
                });
            }
            Err(e) => {
                self.cursor_in_sync = false;
                return Err(e.into());
            }
        }

        log::trace!(
            "Read frame #{target} ({})",
            if sequential { "sequential" } else { "seek" }
        );
        self.current_frame = target;
        self.primed = true;
        self.cursor_in_sync = true;
        Ok(Some(data))
    }

    /// Read and decode frame `index`; `Ok(None)` when it is already current.
    pub fn decode_frame(&mut self, index: i64) -> MediaResult<Option<DecodedFrame>> {
        let Some(raw) = self.read_frame(index)? else {
            return Ok(None);
        };
        let frame = decoder::decode(
            &raw,
            self.geometry.width,
            self.geometry.height,
            self.pixel_format,
            self.channel_order,
        )?;
        Ok(Some(frame))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;

    use tempfile::NamedTempFile;

    /// Write `bytes` to a temp file ending in `suffix`.
    pub fn raw_file(suffix: &str, bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("rawview-")
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    /// `frames` RGB24 frames where every byte of frame `i` equals `i`.
    pub fn numbered_rgb_frames(width: u32, height: u32, frames: u8) -> Vec<u8> {
        let size = width as usize * height as usize * 3;
        (0..frames).flat_map(|i| vec![i; size]).collect()
    }
}
