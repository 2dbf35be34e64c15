/// Streaming-facing context (device/queue + target format).
///
/// This is intentionally small and stable.
pub struct StreamCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub target_format: wgpu::TextureFormat,
}

impl<'a> StreamCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            queue,
            target_format,
        }
    }
}

/// Target for the frame draw (encoder + color view + physical size).
pub struct StreamTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl<'a> StreamTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            encoder,
            color_view,
            width,
            height,
        }
    }
}
