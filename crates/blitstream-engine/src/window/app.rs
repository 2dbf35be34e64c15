use winit::window::Window;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::stream::{PresentLayer, StreamCtx, StreamTarget};

/// Application decision after a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Implemented by the embedding application; called once per redraw.
pub trait App {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}

/// Per-frame context handed to the application.
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
}

impl FrameCtx<'_, '_> {
    /// Acquires a surface frame, runs `f` against it and submits.
    ///
    /// Surface errors are triaged here: transient ones skip the frame (with
    /// a redraw queued after a reconfigure), out-of-memory exits.
    pub fn render<F>(&mut self, f: F) -> AppControl
    where
        F: FnOnce(&StreamCtx<'_>, &mut StreamTarget<'_>, &WindowPresent<'_, '_>),
    {
        let gpu = &mut *self.gpu;

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured => {
                        self.window.request_redraw();
                        AppControl::Continue
                    }
                    SurfaceErrorAction::SkipFrame => AppControl::Continue,
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface ran out of memory, shutting down");
                        AppControl::Exit
                    }
                };
            }
        };

        {
            let size = gpu.size();
            let ctx = StreamCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
            let presenter = WindowPresent {
                gpu,
                window: self.window,
            };
            let mut target =
                StreamTarget::new(&mut frame.encoder, &frame.view, size.width, size.height);
            f(&ctx, &mut target, &presenter);
        }

        self.window.pre_present_notify();
        gpu.submit(frame);
        AppControl::Continue
    }
}

/// Presentation hooks backed by the window and its GPU context.
pub struct WindowPresent<'a, 'w> {
    gpu: &'a Gpu<'w>,
    window: &'a Window,
}

impl PresentLayer for WindowPresent<'_, '_> {
    fn slot_index(&self) -> usize {
        self.gpu.frame_slot()
    }

    fn target_size(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }

    fn device_wait_idle(&self) {
        self.gpu.wait_idle();
    }

    fn request_frame(&self) {
        self.window.request_redraw();
    }
}
