use crate::coords::Mat4;

/// Fixed binding state for the slot textures.
///
/// One bind group per slot (texture view + shared sampler + shared
/// transform uniform) and a per-slot stale flag. A bind group only ever
/// goes stale when the slot pool is rebuilt and the view identity changes;
/// plain partial uploads never touch it.
pub struct BindingManager {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    transform_ubo: wgpu::Buffer,
    groups: Vec<Option<wgpu::BindGroup>>,
    stale: Vec<bool>,
}

impl BindingManager {
    pub fn new(device: &wgpu::Device, slot_count: usize) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blitstream slot bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(transform_min_binding_size()),
                    },
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blitstream slot sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let transform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blitstream transform ubo"),
            size: std::mem::size_of::<Mat4>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            layout,
            sampler,
            transform_ubo,
            groups: (0..slot_count).map(|_| None).collect(),
            stale: vec![true; slot_count],
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Marks every slot's bind group as stale. Called after a slot-pool
    /// rebuild, when every view identity has changed.
    pub fn invalidate_all(&mut self) {
        for stale in &mut self.stale {
            *stale = true;
        }
    }

    /// Rewrites the slot's bind group against `view` if (and only if) it is
    /// stale. Must run before any draw that uses the slot.
    pub fn refresh(&mut self, device: &wgpu::Device, slot: usize, view: &wgpu::TextureView) {
        if !self.stale[slot] && self.groups[slot].is_some() {
            return;
        }

        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blitstream slot bind group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.transform_ubo.as_entire_binding(),
                },
            ],
        });

        self.groups[slot] = Some(group);
        self.stale[slot] = false;
    }

    pub fn group(&self, slot: usize) -> Option<&wgpu::BindGroup> {
        self.groups.get(slot).and_then(|g| g.as_ref())
    }

    /// Uploads the projection*view*model matrix shared by all slots.
    pub fn write_transform(&self, queue: &wgpu::Queue, mvp: &Mat4) {
        queue.write_buffer(&self.transform_ubo, 0, bytemuck::bytes_of(mvp));
    }
}

/// `Mat4` is 64 bytes, so its size is always non-zero. Centralising this
/// avoids `.unwrap()` at the layout-creation site.
fn transform_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<Mat4>() as u64)
        .expect("Mat4 has non-zero size by construction")
}
