//! Cutting a frame range out of a raw video file.

use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::error::{MediaError, MediaResult};
use super::store::VideoSource;

fn check_range(source: &VideoSource, start: usize, end: usize) -> MediaResult<()> {
    let total = source.total_frames();
    if start > end || end >= total {
        return Err(MediaError::InvalidRange { start, end, total });
    }
    Ok(())
}

/// Copy frames `start..=end` byte-for-byte into `dest`. Returns frames written.
///
/// Reads through a separate handle so the source's playback cursor is untouched.
pub fn export_range(
    source: &VideoSource,
    start: usize,
    end: usize,
    dest: &Path,
) -> MediaResult<usize> {
    check_range(source, start, end)?;

    let frames = end - start + 1;
    let frame_size = source.frame_size() as u64;

    let mut input = File::open(source.path())?;
    input.seek(SeekFrom::Start(start as u64 * frame_size))?;
    let mut output = BufWriter::new(File::create(dest)?);

    let wanted = frames as u64 * frame_size;
    let copied = io::copy(&mut input.take(wanted), &mut output)?;
    output.flush()?;
    if copied != wanted {
        return Err(MediaError::TruncatedFrame {
            expected: wanted as usize,
            actual: copied as usize,
        });
    }

    log::info!(
        "Exported frames {}..={} ({} frame{}) to {}",
        start,
        end,
        frames,
        if frames == 1 { "" } else { "s" },
        dest.display()
    );
    Ok(frames)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replace the source file with only frames `start..=end` and reopen it.
///
/// The range is written to `<path>.tmp` first and renamed over the original, so
/// a failed export leaves the original file intact.
pub fn crop_in_place(source: VideoSource, start: usize, end: usize) -> MediaResult<VideoSource> {
    let path = source.path().to_path_buf();
    let tmp = temp_path(&path);

    if let Err(e) = export_range(&source, start, end, &tmp) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    let geometry = source.geometry();
    let order = source.channel_order();
    drop(source);

    std::fs::rename(&tmp, &path)?;
    log::info!("Cropped {} to frames {}..={}", path.display(), start, end);

    VideoSource::open(&path, geometry, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::store::test_support::*;
    use crate::media::types::{ChannelOrder, Geometry};

    fn open(path: &Path) -> VideoSource {
        VideoSource::open(path, Geometry::new(1, 1, 30.0), ChannelOrder::Rgb).unwrap()
    }

    #[test]
    fn export_copies_inclusive_range() {
        let file = raw_file(".rgb", &numbered_rgb_frames(1, 1, 5));
        let src = open(file.path());
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.rgb");

        let written = export_range(&src, 1, 3, &dest).unwrap();
        assert_eq!(written, 3);
        assert_eq!(
            std::fs::read(&dest).unwrap(),
            vec![1, 1, 1, 2, 2, 2, 3, 3, 3]
        );
    }

    #[test]
    fn export_single_frame() {
        let file = raw_file(".rgb", &numbered_rgb_frames(1, 1, 3));
        let src = open(file.path());
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("one.rgb");

        assert_eq!(export_range(&src, 2, 2, &dest).unwrap(), 1);
        assert_eq!(std::fs::read(&dest).unwrap(), vec![2, 2, 2]);
    }

    #[test]
    fn export_rejects_bad_ranges() {
        let file = raw_file(".rgb", &numbered_rgb_frames(1, 1, 3));
        let src = open(file.path());
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("bad.rgb");

        assert!(matches!(
            export_range(&src, 2, 1, &dest),
            Err(MediaError::InvalidRange { start: 2, end: 1, total: 3 })
        ));
        assert!(matches!(
            export_range(&src, 0, 3, &dest),
            Err(MediaError::InvalidRange { .. })
        ));
        assert!(!dest.exists());
    }

    #[test]
    fn export_leaves_playback_position_alone() {
        let file = raw_file(".rgb", &numbered_rgb_frames(1, 1, 4));
        let mut src = open(file.path());
        src.read_frame(1).unwrap();
        let dir = tempfile::tempdir().unwrap();

        export_range(&src, 0, 3, &dir.path().join("all.rgb")).unwrap();
        assert_eq!(src.current_frame(), 1);
        assert_eq!(src.read_frame(2).unwrap(), Some(vec![2, 2, 2]));
    }

    #[test]
    fn crop_in_place_rewrites_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.rgb");
        std::fs::write(&path, numbered_rgb_frames(1, 1, 6)).unwrap();

        let cropped = crop_in_place(open(&path), 2, 4).unwrap();
        assert_eq!(cropped.total_frames(), 3);
        assert_eq!(std::fs::read(&path).unwrap(), vec![2, 2, 2, 3, 3, 3, 4, 4, 4]);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn crop_with_bad_range_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.rgb");
        let original = numbered_rgb_frames(1, 1, 2);
        std::fs::write(&path, &original).unwrap();

        assert!(crop_in_place(open(&path), 0, 5).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), original);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn temp_path_appends_suffix() {
        assert_eq!(
            temp_path(Path::new("/data/clip.yuv")),
            PathBuf::from("/data/clip.yuv.tmp")
        );
    }
}
