//! Transport state machine driving a [`VideoSource`] against user input.
//!
//! The controller owns the source and the playback state. It talks to the
//! outside world through two narrow seams: a [`FrameSink`] (display surface
//! plus seek bar) and an [`InputSource`] (key and seek-bar events).

pub mod channel;
pub mod keys;

use std::time::Duration;

use crate::media::{DecodedFrame, MediaError, MediaResult, VideoSource};
use keys::{KeyPress, TransportKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    /// Terminal: the loop exits.
    Stopped,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        }
    }
}

/// Events delivered by the input collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyPress),
    /// The user moved the seek bar.
    Seek(usize),
    /// The window went away.
    Closed,
}

/// Display surface and seek bar.
pub trait FrameSink {
    /// Called once before the first frame; the seek bar spans `0..=max_index`.
    fn create_seek_control(&mut self, max_index: usize);

    fn show(&mut self, frame: DecodedFrame);

    /// Move the seek bar without reporting it back as a user seek.
    fn set_seek_position(&mut self, index: usize);

    fn set_state(&mut self, _state: PlaybackState) {}
}

/// Source of user input.
pub trait InputSource {
    /// Wait up to `timeout` for the next event (`None` waits indefinitely).
    /// Returns `None` when the timeout elapses first.
    fn poll(&mut self, timeout: Option<Duration>) -> Option<InputEvent>;
}

pub struct PlaybackController {
    source: VideoSource,
    state: PlaybackState,
    frame_interval: Duration,
}

impl PlaybackController {
    pub fn new(source: VideoSource) -> Self {
        let frame_interval = Duration::from_secs_f64(1.0 / source.geometry().frame_rate);
        Self {
            source,
            state: PlaybackState::Playing,
            frame_interval,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Run until stopped: show frame 0, then alternate advancing and polling.
    pub fn run(
        &mut self,
        sink: &mut impl FrameSink,
        input: &mut impl InputSource,
    ) -> MediaResult<()> {
        self.start(sink)?;
        while self.state != PlaybackState::Stopped {
            let timeout = self.tick(sink)?;
            if let Some(event) = input.poll(timeout) {
                self.handle(event, sink)?;
            }
        }
        log::info!("Playback stopped at frame {}", self.source.current_frame());
        Ok(())
    }

    /// Create the seek bar and display the first frame.
    pub fn start(&mut self, sink: &mut impl FrameSink) -> MediaResult<()> {
        sink.create_seek_control(self.source.total_frames() - 1);
        sink.set_state(self.state);
        self.show_frame(0, sink)
    }

    /// One loop step before input is read: auto-pause at the last frame, then
    /// advance if playing. Returns the input timeout (`None` = wait forever).
    pub fn tick(&mut self, sink: &mut impl FrameSink) -> MediaResult<Option<Duration>> {
        if self.state == PlaybackState::Stopped {
            return Ok(None);
        }
        if self.source.is_last_frame() {
            self.set_state(PlaybackState::Paused, sink);
        }
        if self.state == PlaybackState::Playing {
            self.show_frame(self.source.next_index(), sink)?;
        }
        Ok(match self.state {
            PlaybackState::Playing => Some(self.frame_interval),
            PlaybackState::Paused | PlaybackState::Stopped => None,
        })
    }

    pub fn handle(&mut self, event: InputEvent, sink: &mut impl FrameSink) -> MediaResult<()> {
        match event {
            InputEvent::Closed => self.set_state(PlaybackState::Stopped, sink),
            InputEvent::Seek(index) => self.show_frame(index as i64, sink)?,
            InputEvent::Key(key) => match TransportKey::from_key(&key) {
                Some(TransportKey::Quit) => self.set_state(PlaybackState::Stopped, sink),
                Some(TransportKey::TogglePause) => {
                    let next = match self.state {
                        PlaybackState::Playing => PlaybackState::Paused,
                        PlaybackState::Paused => PlaybackState::Playing,
                        PlaybackState::Stopped => PlaybackState::Stopped,
                    };
                    self.set_state(next, sink);
                }
                Some(TransportKey::StepForward) => {
                    self.show_frame(self.source.next_index(), sink)?;
                }
                Some(TransportKey::StepBack) => {
                    self.show_frame(self.source.prev_index(), sink)?;
                }
                None => log::warn!("Unidentified key detected: {key}"),
            },
        }
        Ok(())
    }

    fn set_state(&mut self, state: PlaybackState, sink: &mut impl FrameSink) {
        if self.state != state {
            log::debug!("{} -> {}", self.state.label(), state.label());
            self.state = state;
            sink.set_state(state);
        }
    }

    fn show_frame(&mut self, index: i64, sink: &mut impl FrameSink) -> MediaResult<()> {
        match self.source.decode_frame(index) {
            Ok(Some(frame)) => {
                sink.show(frame);
                sink.set_seek_position(self.source.current_frame());
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e @ MediaError::TruncatedFrame { .. }) => {
                log::warn!("Skipping frame {index}: {e}");
                self.set_state(PlaybackState::Paused, sink);
                Ok(())
            }
            Err(e) => {
                log::error!("Stopping playback: {e}");
                self.set_state(PlaybackState::Stopped, sink);
                Err(e)
            }
        }
    }
}
