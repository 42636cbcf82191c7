//! Raw frame bytes → RGB8 image.
//!
//! - Planar 4:2:0: chroma planes are upsampled by 2x2 sample duplication (no
//!   filtering), then converted with full-range ITU-R BT.601
//! - Interleaved RGB24: channels are reordered from the file's storage order

use super::error::{MediaError, MediaResult};
use super::store::frame_size_bytes;
use super::types::{ChannelOrder, DecodedFrame, PixelFormat};

/// Decode one frame. `raw` must be exactly one frame long.
pub fn decode(
    raw: &[u8],
    width: u32,
    height: u32,
    format: PixelFormat,
    order: ChannelOrder,
) -> MediaResult<DecodedFrame> {
    let expected = frame_size_bytes(format, width, height)?;
    if raw.len() != expected {
        return Err(MediaError::TruncatedFrame {
            expected,
            actual: raw.len(),
        });
    }

    let data = match format {
        PixelFormat::Yuv420Planar => decode_yuv420(raw, width as usize, height as usize),
        PixelFormat::Rgb24Interleaved => decode_rgb24(raw, order),
    };

    Ok(DecodedFrame {
        data,
        width,
        height,
    })
}

fn decode_yuv420(raw: &[u8], width: usize, height: usize) -> Vec<u8> {
    let luma_len = width * height;
    let chroma_len = luma_len / 4;
    let (y_plane, chroma) = raw.split_at(luma_len);
    let (u_plane, v_plane) = chroma.split_at(chroma_len);

    let u_full = upsample_2x2(u_plane, width / 2);
    let v_full = upsample_2x2(v_plane, width / 2);

    let mut rgb = Vec::with_capacity(luma_len * 3);
    for ((&y, &u), &v) in y_plane.iter().zip(&u_full).zip(&v_full) {
        rgb.extend_from_slice(&yuv_to_rgb(y, u, v));
    }
    rgb
}

/// Nearest-neighbor 2x upsampling of a row-major plane in both axes.
///
/// Each sample is duplicated along its row, then each widened row is emitted
/// twice, so every input sample covers exactly one 2x2 output block.
pub fn upsample_2x2(plane: &[u8], plane_width: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(plane.len() * 4);
    for row in plane.chunks_exact(plane_width) {
        let start = out.len();
        for &sample in row {
            out.extend_from_slice(&[sample, sample]);
        }
        out.extend_from_within(start..);
    }
    out
}

/// Full-range BT.601 (JPEG/JFIF) YCbCr → RGB.
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = f32::from(y);
    let u = f32::from(u) - 128.0;
    let v = f32::from(v) - 128.0;

    let r = y + 1.402 * v;
    let g = y - 0.344_136 * u - 0.714_136 * v;
    let b = y + 1.772 * u;

    [to_channel(r), to_channel(g), to_channel(b)]
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn decode_rgb24(raw: &[u8], order: ChannelOrder) -> Vec<u8> {
    match order {
        ChannelOrder::Rgb => raw.to_vec(),
        ChannelOrder::Bgr => raw
            .chunks_exact(3)
            .flat_map(|px| [px[2], px[1], px[0]])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Planar 4:2:0 frame with constant luma and the given chroma planes.
    fn yuv_frame(width: usize, height: usize, luma: u8, u: &[u8], v: &[u8]) -> Vec<u8> {
        assert_eq!(u.len(), width * height / 4);
        assert_eq!(v.len(), width * height / 4);
        let mut raw = vec![luma; width * height];
        raw.extend_from_slice(u);
        raw.extend_from_slice(v);
        raw
    }

    #[test]
    fn upsample_duplicates_into_blocks() {
        let plane = [1, 2, 3, 4];
        assert_eq!(
            upsample_2x2(&plane, 2),
            vec![
                1, 1, 2, 2, //
                1, 1, 2, 2, //
                3, 3, 4, 4, //
                3, 3, 4, 4,
            ]
        );
    }

    #[test]
    fn upsample_non_square_plane() {
        // 3 wide, 1 tall → 6 wide, 2 tall
        assert_eq!(
            upsample_2x2(&[7, 8, 9], 3),
            vec![7, 7, 8, 8, 9, 9, 7, 7, 8, 8, 9, 9]
        );
    }

    #[test]
    fn neutral_chroma_is_gray() {
        for y in [0u8, 1, 64, 128, 200, 255] {
            assert_eq!(yuv_to_rgb(y, 128, 128), [y, y, y]);
        }
    }

    #[test]
    fn saturated_red_converts() {
        // Full-range BT.601 red is approximately Y=76, Cb=85, Cr=255
        assert_eq!(yuv_to_rgb(76, 85, 255), [254, 0, 0]);
    }

    #[test]
    fn conversion_clamps_out_of_gamut() {
        assert_eq!(yuv_to_rgb(255, 255, 255)[0], 255);
        assert_eq!(yuv_to_rgb(0, 0, 0)[0], 0);
        assert_eq!(yuv_to_rgb(0, 0, 0)[2], 0);
    }

    #[test]
    fn solid_black_and_white_frames() {
        let black = yuv_frame(4, 4, 0, &[128; 4], &[128; 4]);
        let frame = decode(&black, 4, 4, PixelFormat::Yuv420Planar, ChannelOrder::Rgb).unwrap();
        assert_eq!(frame.data.len(), 4 * 4 * 3);
        assert!(frame.data.iter().all(|&c| c == 0));

        let white = yuv_frame(4, 4, 255, &[128; 4], &[128; 4]);
        let frame = decode(&white, 4, 4, PixelFormat::Yuv420Planar, ChannelOrder::Rgb).unwrap();
        assert!(frame.data.iter().all(|&c| c == 255));
    }

    #[test]
    fn chroma_blocks_decode_uniformly() {
        let u = [40, 90, 160, 220];
        let v = [200, 128, 60, 10];
        let raw = yuv_frame(4, 4, 128, &u, &v);
        let frame = decode(&raw, 4, 4, PixelFormat::Yuv420Planar, ChannelOrder::Rgb).unwrap();

        for by in 0..2u32 {
            for bx in 0..2u32 {
                let i = (by * 2 + bx) as usize;
                let want = yuv_to_rgb(128, u[i], v[i]);
                for dy in 0..2 {
                    for dx in 0..2 {
                        assert_eq!(
                            frame.pixel(bx * 2 + dx, by * 2 + dy),
                            want,
                            "block ({bx},{by}) pixel ({dx},{dy})"
                        );
                    }
                }
            }
        }
        // neighbouring blocks are not blended
        assert_ne!(frame.pixel(1, 0), frame.pixel(2, 0));
    }

    #[test]
    fn luma_detail_survives_upsampling() {
        let mut raw = yuv_frame(2, 2, 0, &[128], &[128]);
        raw[..4].copy_from_slice(&[10, 20, 30, 40]);
        let frame = decode(&raw, 2, 2, PixelFormat::Yuv420Planar, ChannelOrder::Rgb).unwrap();
        assert_eq!(frame.pixel(0, 0), [10, 10, 10]);
        assert_eq!(frame.pixel(1, 0), [20, 20, 20]);
        assert_eq!(frame.pixel(0, 1), [30, 30, 30]);
        assert_eq!(frame.pixel(1, 1), [40, 40, 40]);
    }

    #[test]
    fn rgb_order_is_identity() {
        let raw = [1, 2, 3, 4, 5, 6];
        let frame = decode(&raw, 2, 1, PixelFormat::Rgb24Interleaved, ChannelOrder::Rgb).unwrap();
        assert_eq!(frame.data, raw.to_vec());
    }

    #[test]
    fn bgr_order_swaps_outer_channels() {
        let raw = [1, 2, 3, 4, 5, 6];
        let frame = decode(&raw, 2, 1, PixelFormat::Rgb24Interleaved, ChannelOrder::Bgr).unwrap();
        assert_eq!(frame.data, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn wrong_length_is_truncated_frame() {
        let err = decode(&[0; 23], 4, 4, PixelFormat::Yuv420Planar, ChannelOrder::Rgb).unwrap_err();
        assert!(matches!(
            err,
            MediaError::TruncatedFrame {
                expected: 24,
                actual: 23
            }
        ));
        let err = decode(&[0; 7], 1, 2, PixelFormat::Rgb24Interleaved, ChannelOrder::Rgb).unwrap_err();
        assert!(matches!(err, MediaError::TruncatedFrame { expected: 6, .. }));
    }
}
