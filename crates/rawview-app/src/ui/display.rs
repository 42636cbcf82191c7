use winit::event_loop::EventLoopProxy;

use super::viewer::ViewerMessage;
use crate::media::DecodedFrame;
use crate::playback::{FrameSink, PlaybackState};

/// Frame sink living on the playback thread; forwards everything to the
/// window's event loop.
pub struct ProxyDisplay {
    proxy: EventLoopProxy<ViewerMessage>,
}

impl ProxyDisplay {
    pub fn new(proxy: EventLoopProxy<ViewerMessage>) -> Self {
        Self { proxy }
    }

    fn send(&self, message: ViewerMessage) {
        if self.proxy.send_event(message).is_err() {
            log::debug!("Viewer event loop gone, dropping update");
        }
    }
}

impl FrameSink for ProxyDisplay {
    fn create_seek_control(&mut self, max_index: usize) {
        self.send(ViewerMessage::SeekRange(max_index));
    }

    fn show(&mut self, frame: DecodedFrame) {
        self.send(ViewerMessage::Frame(frame));
    }

    fn set_seek_position(&mut self, index: usize) {
        self.send(ViewerMessage::SeekPosition(index));
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.send(ViewerMessage::State(state));
    }
}
