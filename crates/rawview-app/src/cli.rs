use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::media::ChannelOrder;
use crate::settings::SettingsConfig;

pub const USAGE: &str = "\
Usage: rawview [OPTIONS] <FILE>

Plays headerless raw video. Files ending in .yuv are read as planar
YUV 4:2:0, anything else as interleaved 24-bit RGB.

Options:
  -w, --width <PX>         Frame width
  -h, --height <PX>        Frame height
  -f, --frame-rate <FPS>   Playback rate in frames per second
      --bgr                RGB files store blue first
      --save-settings      Remember the geometry options as defaults
      --crop <START:END>   Write frames START..=END and exit
      --output <PATH>      Destination for --crop (default: crop in place)
      --help               Print this message

Keys: Space play/pause, . or Right next frame, , or Left previous frame,
q or Esc quit.";

/// Parsed command line. Geometry options override stored settings.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    pub file: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<f64>,
    pub bgr: bool,
    pub save_settings: bool,
    pub crop: Option<(usize, usize)>,
    pub output: Option<PathBuf>,
    pub help: bool,
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            // Accept both `--width 640` and `--width=640`
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };
            let mut value = |name: &str| -> Result<String> {
                match inline.clone() {
                    Some(v) => Ok(v),
                    None => args.next().with_context(|| format!("{name} needs a value")),
                }
            };

            match flag.as_str() {
                "-w" | "--width" => parsed.width = Some(parse_number(&value(&flag)?, &flag)?),
                "-h" | "--height" => parsed.height = Some(parse_number(&value(&flag)?, &flag)?),
                "-f" | "--frame-rate" => {
                    parsed.frame_rate = Some(parse_number(&value(&flag)?, &flag)?);
                }
                "--bgr" => parsed.bgr = true,
                "--save-settings" => parsed.save_settings = true,
                "--crop" => parsed.crop = Some(parse_range(&value(&flag)?)?),
                "--output" => parsed.output = Some(PathBuf::from(value(&flag)?)),
                "--help" => parsed.help = true,
                other if other.starts_with('-') && other.len() > 1 => {
                    bail!("Unknown option: {other}")
                }
                _ => {
                    if parsed.file.is_some() {
                        bail!("Unexpected argument: {arg}");
                    }
                    parsed.file = Some(PathBuf::from(arg));
                }
            }
        }

        if parsed.output.is_some() && parsed.crop.is_none() {
            bail!("--output requires --crop");
        }
        Ok(parsed)
    }

    /// Layer command-line geometry over the stored settings.
    pub fn apply(&self, settings: &mut SettingsConfig) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(frame_rate) = self.frame_rate {
            settings.frame_rate = frame_rate;
        }
        if self.bgr {
            settings.rgb_order = ChannelOrder::Bgr;
        }
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, flag: &str) -> Result<T> {
    text.trim()
        .parse()
        .ok()
        .with_context(|| format!("Invalid value for {flag}: {text:?}"))
}

fn parse_range(text: &str) -> Result<(usize, usize)> {
    let (start, end) = text
        .split_once(':')
        .with_context(|| format!("Expected START:END, got {text:?}"))?;
    Ok((
        parse_number(start, "--crop")?,
        parse_number(end, "--crop")?,
    ))
}
