use std::ops::Range;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use super::material::{BasicMeshEntry, Material};
use super::vertex::{Index, SimpleVertex, INDEX_FORMAT};
use crate::math::Transform;
use crate::renderer::{
    CbChangesEveryFrame, GpuCtx, Name, MATERIAL_GROUP, OBJECT_BINDING, OBJECT_GROUP,
    SAMPLER_BINDING, TEXTURE_BINDING,
};

type RenderableUpdate = Box<dyn FnMut(&mut Transform, f32)>;

/// One drawable object: geometry, materials, world transform and the names of
/// the shaders it is drawn with.
///
/// GPU buffers are created once by [`Renderable::initialize`]; a renderable
/// cannot be initialized twice.
pub struct Renderable {
    vertices: Vec<SimpleVertex>,
    indices: Vec<Index>,
    meshes: Vec<BasicMeshEntry>,
    materials: Vec<Material>,

    output_color: Vec4,
    transform: Transform,

    vertex_shader: Option<Name>,
    pixel_shader: Option<Name>,

    update: Option<RenderableUpdate>,

    gpu: Option<RenderableGpu>,
}

struct RenderableGpu {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    constant_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    material_bind_group: Option<wgpu::BindGroup>,
    ranges: Vec<Range<u32>>,
}

impl Renderable {
    /// Empty renderable drawn in `output_color` when it has no texture.
    pub fn new(output_color: Vec4) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            meshes: Vec::new(),
            materials: Vec::new(),
            output_color,
            transform: Transform::IDENTITY,
            vertex_shader: None,
            pixel_shader: None,
            update: None,
            gpu: None,
        }
    }

    /// Sets the geometry as a single mesh using material 0.
    pub fn with_geometry(mut self, vertices: Vec<SimpleVertex>, indices: Vec<Index>) -> Self {
        self.meshes = vec![BasicMeshEntry {
            base_index: 0,
            num_indices: indices.len() as u32,
            material_index: 0,
        }];
        self.vertices = vertices;
        self.indices = indices;
        self
    }

    /// Replaces the mesh split; entries index into the current index buffer.
    pub fn with_meshes(mut self, meshes: Vec<BasicMeshEntry>) -> Self {
        self.meshes = meshes;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    /// Per-frame behaviour, called from `Renderer::update` with the delta time.
    pub fn with_update(mut self, update: impl FnMut(&mut Transform, f32) + 'static) -> Self {
        self.update = Some(Box::new(update));
        self
    }

    pub fn update(&mut self, delta_time: f32) {
        if let Some(update) = self.update.as_mut() {
            update(&mut self.transform, delta_time);
        }
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.transform.rotate_x(angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.transform.rotate_y(angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.transform.rotate_z(angle);
    }

    pub fn rotate_roll_pitch_yaw(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.transform.rotate_roll_pitch_yaw(pitch, yaw, roll);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.transform.scale(x, y, z);
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.transform.translate(offset);
    }

    /// Replaces the accumulated world matrix.
    pub fn set_world(&mut self, world: Mat4) {
        self.transform.set(world);
    }

    pub fn world(&self) -> Mat4 {
        self.transform.matrix()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn output_color(&self) -> Vec4 {
        self.output_color
    }

    pub fn set_output_color(&mut self, color: Vec4) {
        self.output_color = color;
    }

    pub fn vertices(&self) -> &[SimpleVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    pub fn meshes(&self) -> &[BasicMeshEntry] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn num_vertices(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn num_indices(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_shader(&self) -> Option<&Name> {
        self.vertex_shader.as_ref()
    }

    pub fn pixel_shader(&self) -> Option<&Name> {
        self.pixel_shader.as_ref()
    }

    pub(crate) fn set_vertex_shader(&mut self, name: Name) {
        self.vertex_shader = Some(name);
    }

    pub(crate) fn set_pixel_shader(&mut self, name: Name) {
        self.pixel_shader = Some(name);
    }

    /// True when some material carries a diffuse texture.
    pub fn has_texture(&self) -> bool {
        self.materials.iter().any(|m| m.diffuse.is_some())
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    /// Payload of the per-object constant buffer for the current state.
    pub fn constants(&self) -> CbChangesEveryFrame {
        CbChangesEveryFrame::new(self.world(), self.output_color)
    }

    /// Index ranges drawn, one per mesh entry; the whole index buffer when
    /// no meshes were declared.
    ///
    /// Fails when a mesh reaches past the index buffer or names a material
    /// that does not exist.
    pub fn index_ranges(&self) -> Result<Vec<Range<u32>>> {
        if self.meshes.is_empty() {
            return Ok(vec![0..self.num_indices()]);
        }
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, m)| -> Result<Range<u32>> {
                let end = m
                    .base_index
                    .checked_add(m.num_indices)
                    .filter(|&end| end as usize <= self.indices.len())
                    .with_context(|| {
                        format!(
                            "mesh {i} spans indices {}+{} but only {} exist",
                            m.base_index,
                            m.num_indices,
                            self.indices.len()
                        )
                    })?;
                if !self.materials.is_empty() && m.material_index as usize >= self.materials.len() {
                    anyhow::bail!(
                        "mesh {i} uses material {} but only {} exist",
                        m.material_index,
                        self.materials.len()
                    );
                }
                Ok(m.base_index..end)
            })
            .collect()
    }

    /// Creates the vertex, index and constant buffers and uploads textures.
    ///
    /// Buffers created before a failure stay allocated until the renderable
    /// is dropped.
    pub fn initialize(&mut self, ctx: &GpuCtx<'_>) -> Result<()> {
        anyhow::ensure!(self.gpu.is_none(), "renderable is already initialized");
        anyhow::ensure!(
            !self.vertices.is_empty() && !self.indices.is_empty(),
            "renderable has no geometry"
        );
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            anyhow::bail!(
                "index {bad} is out of range for {} vertices",
                self.vertices.len()
            );
        }
        let ranges = self.index_ranges()?;

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen renderable vbo"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen renderable ibo"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let constant_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen renderable cb"),
            contents: bytemuck::bytes_of(&self.constants()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let object_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen renderable bind group"),
            layout: &ctx.layouts.object,
            entries: &[wgpu::BindGroupEntry {
                binding: OBJECT_BINDING,
                resource: constant_buffer.as_entire_binding(),
            }],
        });

        for (i, material) in self.materials.iter_mut().enumerate() {
            if let Some(texture) = material.diffuse.as_mut() {
                if !texture.is_initialized() {
                    texture
                        .initialize(ctx.device, ctx.queue)
                        .with_context(|| format!("material {i}"))?;
                }
            }
        }

        let material_bind_group = self
            .materials
            .iter()
            .find_map(|m| m.diffuse.as_ref())
            .and_then(|t| Some((t.view()?, t.sampler()?)))
            .map(|(view, sampler)| {
                ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("lumen material bind group"),
                    layout: &ctx.layouts.material,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: TEXTURE_BINDING,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: SAMPLER_BINDING,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                    ],
                })
            });

        log::debug!(
            "renderable initialized ({} vertices, {} indices, textured: {})",
            self.vertices.len(),
            self.indices.len(),
            material_bind_group.is_some()
        );

        self.gpu = Some(RenderableGpu {
            vertex_buffer,
            index_buffer,
            constant_buffer,
            object_bind_group,
            material_bind_group,
            ranges,
        });
        Ok(())
    }

    /// Drops GPU buffers and material textures so the renderable can be
    /// initialized against another device.
    pub(crate) fn release(&mut self) {
        self.gpu = None;
        for texture in self.materials.iter_mut().filter_map(|m| m.diffuse.as_mut()) {
            texture.release();
        }
    }

    /// Uploads `constants` into this renderable's constant buffer.
    pub(crate) fn write_constants(&self, queue: &wgpu::Queue, constants: &CbChangesEveryFrame) {
        if let Some(gpu) = self.gpu.as_ref() {
            queue.write_buffer(&gpu.constant_buffer, 0, bytemuck::bytes_of(constants));
        }
    }

    /// Binds buffers and bind groups and issues the indexed draws.
    ///
    /// The pipeline must already be set. Returns `false` when nothing was drawn.
    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(gpu) = self.gpu.as_ref() else {
            return false;
        };

        pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        pass.set_index_buffer(gpu.index_buffer.slice(..), INDEX_FORMAT);
        pass.set_bind_group(OBJECT_GROUP, &gpu.object_bind_group, &[]);
        if let Some(material) = gpu.material_bind_group.as_ref() {
            pass.set_bind_group(MATERIAL_GROUP, material, &[]);
        }

        for range in &gpu.ranges {
            pass.draw_indexed(range.clone(), 0, 0..1);
        }
        true
    }
}

impl Default for Renderable {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}

impl std::fmt::Debug for Renderable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderable")
            .field("vertices", &self.vertices.len())
            .field("indices", &self.indices.len())
            .field("materials", &self.materials.len())
            .field("output_color", &self.output_color)
            .field("vertex_shader", &self.vertex_shader)
            .field("pixel_shader", &self.pixel_shader)
            .field("initialized", &self.gpu.is_some())
            .finish()
    }
}
