//! Headerless raw video: frame store, pixel decoder and range export.

pub mod crop;
pub mod decoder;
pub mod error;
pub mod store;
pub mod types;

pub use error::{MediaError, MediaResult};
pub use store::VideoSource;
pub use types::{ChannelOrder, DecodedFrame, Geometry};

#[cfg(test)]
mod tests {
    use super::store::test_support::raw_file;
    use super::*;

    /// Two 4x4 planar frames: solid black, then solid white.
    fn black_then_white() -> Vec<u8> {
        let mut bytes = Vec::new();
        for luma in [0u8, 255] {
            bytes.extend(std::iter::repeat_n(luma, 16));
            bytes.extend(std::iter::repeat_n(128u8, 8));
        }
        bytes
    }

    #[test]
    fn two_frame_yuv_file_end_to_end() {
        let file = raw_file(".yuv", &black_then_white());
        let mut src =
            VideoSource::open(file.path(), Geometry::new(4, 4, 30.0), ChannelOrder::Rgb).unwrap();
        assert_eq!(src.total_frames(), 2);

        let black = src.decode_frame(0).unwrap().unwrap();
        assert_eq!((black.width, black.height), (4, 4));
        assert!(black.data.iter().all(|&c| c == 0));
        assert!(!src.is_last_frame());

        let white = src.decode_frame(src.next_index()).unwrap().unwrap();
        assert!(white.data.iter().all(|&c| c == 255));
        assert!(src.is_last_frame());
    }

    #[test]
    fn repeated_seek_decodes_once() {
        let file = raw_file(".yuv", &black_then_white());
        let mut src =
            VideoSource::open(file.path(), Geometry::new(4, 4, 30.0), ChannelOrder::Rgb).unwrap();

        let first = src.decode_frame(1).unwrap();
        assert!(first.is_some());
        assert!(src.decode_frame(1).unwrap().is_none());
        assert_eq!(src.current_frame(), 1);
    }
}
