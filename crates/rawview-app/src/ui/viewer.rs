use egui::{Color32, Context, Id, Pos2, Rect, RichText, TextureHandle, TextureOptions, Vec2};

use crate::media::DecodedFrame;
use crate::playback::PlaybackState;
use crate::playback::keys::Shortcuts;

const SEEK_SIGNAL: &str = "viewer_seek";

/// Updates sent from the playback thread to the window.
#[derive(Debug)]
pub enum ViewerMessage {
    SeekRange(usize),
    Frame(DecodedFrame),
    SeekPosition(usize),
    State(PlaybackState),
}

/// Facts about the open file, collected before the event loop starts.
#[derive(Debug, Clone)]
pub struct ViewerInfo {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub format: &'static str,
}

/// What the window currently shows.
#[derive(Default)]
pub struct ViewerView {
    pending: Option<DecodedFrame>,
    texture: Option<TextureHandle>,
    seek_max: Option<usize>,
    seek_position: usize,
    state: Option<PlaybackState>,
}

impl ViewerView {
    pub fn apply(&mut self, message: ViewerMessage) {
        match message {
            ViewerMessage::SeekRange(max) => self.seek_max = Some(max),
            // Only the newest frame matters if several arrive between redraws
            ViewerMessage::Frame(frame) => self.pending = Some(frame),
            ViewerMessage::SeekPosition(index) => self.seek_position = index,
            ViewerMessage::State(state) => self.state = Some(state),
        }
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.state
    }

    fn upload(&mut self, ctx: &Context) {
        let Some(frame) = self.pending.take() else {
            return;
        };
        let size = [frame.width as usize, frame.height as usize];
        let image = egui::ColorImage::from_rgb(size, &frame.data);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                let texture = ctx.load_texture("video-frame", image, TextureOptions::NEAREST);
                self.texture = Some(texture);
            }
        }
    }

    pub fn draw(&mut self, ctx: &Context, info: &ViewerInfo) {
        self.upload(ctx);

        egui::TopBottomPanel::bottom("transport").show(ctx, |ui| {
            ui.add_space(4.0);

            let max = self.seek_max.unwrap_or(0);
            let mut position = self.seek_position.min(max);
            ui.spacing_mut().slider_width = (ui.available_width() - 72.0).max(64.0);
            let slider = ui.add_enabled(
                self.seek_max.is_some(),
                egui::Slider::new(&mut position, 0..=max).show_value(true),
            );
            if slider.changed() {
                self.seek_position = position;
                ctx.data_mut(|d| d.insert_temp(Id::new(SEEK_SIGNAL), position));
            }

            ui.horizontal(|ui| {
                let state = self.state.map_or("Loading", PlaybackState::label);
                ui.label(RichText::new(state).strong());
                ui.label(format!(
                    "Frame {}/{}",
                    self.seek_position + 1,
                    info.total_frames
                ));
                ui.label(
                    RichText::new(format!("{}x{} {}", info.width, info.height, info.format))
                        .weak(),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    for (keys, action) in Shortcuts::legend().iter().rev() {
                        ui.label(RichText::new(format!("{keys}: {action}")).small().weak());
                    }
                });
            });
            ui.add_space(2.0);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let Some(texture) = &self.texture else {
                    return;
                };
                let area = ui.max_rect();
                let size = fit_size(texture.size_vec2(), area.size());
                let rect = Rect::from_center_size(area.center(), size);
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
            });
    }
}

/// Seek bar position the user picked during the last pass, if any.
pub fn take_seek_request(ctx: &Context) -> Option<usize> {
    ctx.data_mut(|d| d.remove_temp::<usize>(Id::new(SEEK_SIGNAL)))
}

/// Largest size with the media's aspect ratio that fits in `available`.
pub fn fit_size(media: Vec2, available: Vec2) -> Vec2 {
    if media.x <= 0.0 || media.y <= 0.0 || available.x <= 0.0 || available.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (available.x / media.x).min(available.y / media.y);
    media * scale
}
