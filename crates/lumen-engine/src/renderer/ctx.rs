use super::constants::{
    CAMERA_BINDING, LIGHTS_BINDING, OBJECT_BINDING, RESIZE_BINDING, SAMPLER_BINDING,
    TEXTURE_BINDING,
};

/// Device-facing context handed to collaborators during initialization.
///
/// This is intentionally small and stable.
pub struct GpuCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub layouts: &'a BindLayouts,
}

impl<'a> GpuCtx<'a> {
    #[inline]
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, layouts: &'a BindLayouts) -> Self {
        Self {
            device,
            queue,
            layouts,
        }
    }
}

/// Bind group and pipeline layouts shared by every draw.
pub struct BindLayouts {
    pub(crate) frame: wgpu::BindGroupLayout,
    pub(crate) object: wgpu::BindGroupLayout,
    pub(crate) material: wgpu::BindGroupLayout,
    pub(crate) untextured_pipeline: wgpu::PipelineLayout,
    pub(crate) textured_pipeline: wgpu::PipelineLayout,
}

impl BindLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let vs_ps = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;

        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen frame bgl"),
            entries: &[
                uniform_entry(CAMERA_BINDING, vs_ps),
                uniform_entry(RESIZE_BINDING, wgpu::ShaderStages::VERTEX),
                uniform_entry(LIGHTS_BINDING, vs_ps),
            ],
        });

        let object = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen object bgl"),
            entries: &[uniform_entry(OBJECT_BINDING, vs_ps)],
        });

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen material bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: TEXTURE_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: SAMPLER_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let untextured_pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen untextured pipeline layout"),
            bind_group_layouts: &[&frame, &object],
            immediate_size: 0,
        });

        let textured_pipeline = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen textured pipeline layout"),
            bind_group_layouts: &[&frame, &object, &material],
            immediate_size: 0,
        });

        Self {
            frame,
            object,
            material,
            untextured_pipeline,
            textured_pipeline,
        }
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
