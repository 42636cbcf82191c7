//! Cross-thread plumbing between the window and the playback loop.

use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use super::{FrameSink, InputEvent, InputSource, PlaybackController};
use crate::media::MediaResult;

/// Input queue fed by the window thread.
pub struct ChannelInput {
    rx: Receiver<InputEvent>,
}

impl ChannelInput {
    pub fn new(rx: Receiver<InputEvent>) -> Self {
        Self { rx }
    }
}

/// Create a connected sender/input pair.
pub fn input_channel() -> (Sender<InputEvent>, ChannelInput) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (tx, ChannelInput::new(rx))
}

impl InputSource for ChannelInput {
    fn poll(&mut self, timeout: Option<Duration>) -> Option<InputEvent> {
        match timeout {
            Some(timeout) => match self.rx.recv_timeout(timeout) {
                Ok(event) => Some(event),
                Err(RecvTimeoutError::Timeout) => None,
                // Window side is gone
                Err(RecvTimeoutError::Disconnected) => Some(InputEvent::Closed),
            },
            None => Some(self.rx.recv().unwrap_or(InputEvent::Closed)),
        }
    }
}

/// Run the playback loop on its own thread.
pub fn spawn_playback<S>(
    mut controller: PlaybackController,
    mut sink: S,
    mut input: ChannelInput,
) -> std::io::Result<JoinHandle<MediaResult<()>>>
where
    S: FrameSink + Send + 'static,
{
    std::thread::Builder::new()
        .name("playback".into())
        .spawn(move || controller.run(&mut sink, &mut input))
}
