use std::sync::Arc;

use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::gpu::GpuContext;
use crate::ui::overlay::EguiOverlay;
use crate::ui::viewer::{self, ViewerInfo, ViewerView};

/// GPU-side state of the open viewer window.
pub struct App {
    pub window: Arc<Window>,
    pub gpu: GpuContext,
    pub egui_overlay: EguiOverlay,
}

impl App {
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let gpu = GpuContext::new(window.clone())?;
        let egui_overlay = EguiOverlay::new(&gpu.device, gpu.format, &window);
        Ok(Self {
            window,
            gpu,
            egui_overlay,
        })
    }

    /// Feed a window event to egui. Returns true if egui used it.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        let response = self.egui_overlay.handle_event(&self.window, event);
        if response.repaint {
            self.window.request_redraw();
        }
        response.consumed
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.egui_overlay
            .resize(width, height, self.window.scale_factor() as f32);
    }

    /// Draw the current frame and transport bar. Returns the seek bar
    /// position if the user moved it.
    pub fn render(
        &mut self,
        view: &mut ViewerView,
        info: &ViewerInfo,
    ) -> Result<Option<usize>, wgpu::SurfaceError> {
        self.egui_overlay.begin_frame(&self.window);
        let ctx = self.egui_overlay.context();
        view.draw(&ctx, info);
        let seek = viewer::take_seek_request(&ctx);
        self.egui_overlay.end_frame(&self.window);

        let output = self.gpu.acquire()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("rawview-encoder"),
                });

        self.egui_overlay
            .render(&self.gpu.device, &self.gpu.queue, &mut encoder, &surface_view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(seek)
    }
}
