use anyhow::Result;

use blitstream_engine::device::GpuInit;
use blitstream_engine::logging::{init_logging, LoggingConfig};
use blitstream_engine::source::BouncingBoxSource;
use blitstream_engine::stream::{FrameDriver, StreamCtx};
use blitstream_engine::window::{App, AppControl, FrameCtx, Runtime, RuntimeConfig};

const RASTER_WIDTH: u32 = 512;
const RASTER_HEIGHT: u32 = 512;

/// Streams an animated CPU raster into the window.
///
/// The driver needs the device and surface format, so it is created lazily
/// on the first frame rather than at construction.
struct Viewer {
    driver: Option<FrameDriver<BouncingBoxSource>>,
}

impl App for Viewer {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.driver.is_none() {
            let stream_ctx = StreamCtx::new(
                ctx.gpu.device(),
                ctx.gpu.queue(),
                ctx.gpu.surface_format(),
            );
            let source = BouncingBoxSource::new(RASTER_WIDTH, RASTER_HEIGHT);
            self.driver = Some(FrameDriver::new(&stream_ctx, ctx.gpu.slot_count(), source));
            log::info!("frame driver ready, {} slots", ctx.gpu.slot_count());
        }

        let Some(driver) = self.driver.as_mut() else {
            return AppControl::Continue;
        };
        ctx.render(|stream_ctx, target, present| {
            driver.on_frame(stream_ctx, target, present);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "blitstream viewer".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        Viewer { driver: None },
    )
}
