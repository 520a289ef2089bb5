use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

use super::constants::{
    CbChangeOnResize, CbLights, CAMERA_BINDING, FRAME_GROUP, LIGHTS_BINDING, RESIZE_BINDING,
};
use super::ctx::{BindLayouts, GpuCtx};
use super::error::RegistryError;
use super::frame::{pack_lights, FrameData, FramePlan};
use super::pipeline::{check_bindings, PipelineCache, PipelineKey};
use super::registry::{Name, Registry};
use crate::camera::Camera;
use crate::device::{
    DriverType, FeatureLevel, Gpu, RenderWindow, RendererInit, SurfaceErrorAction, SwapChainPath,
};
use crate::input::{DirectionsInput, MouseRelativeMovement};
use crate::light::{PointLight, NUM_LIGHTS};
use crate::math::Projection;
use crate::renderable::Renderable;
use crate::shader::{PixelShader, VertexShader};

/// Forward renderer owning the device, the scene registries and the camera.
///
/// Registration never touches the GPU. [`Renderer::initialize`] initializes
/// everything registered so far; anything registered afterwards must be
/// initialized through `initialize_renderable` and friends.
pub struct Renderer {
    init: RendererInit,
    gpu: Option<GpuResources>,

    projection: Projection,
    camera: Camera,
    point_lights: [Option<PointLight>; NUM_LIGHTS],

    renderables: Registry<Renderable>,
    vertex_shaders: Registry<VertexShader>,
    pixel_shaders: Registry<PixelShader>,
}

/// Everything that exists only after a successful `initialize`.
struct GpuResources {
    gpu: Gpu,
    layouts: BindLayouts,
    resize_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    pipelines: PipelineCache,
    /// Renderables already reported as undrawable.
    warned: HashSet<Name>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_init(RendererInit::default())
    }

    pub fn with_init(init: RendererInit) -> Self {
        Self {
            init,
            gpu: None,
            projection: Projection::default(),
            camera: Camera::default(),
            point_lights: std::array::from_fn(|_| None),
            renderables: Registry::new(),
            vertex_shaders: Registry::new(),
            pixel_shaders: Registry::new(),
        }
    }

    /// Creates the device, swap chain, depth target and frame constant
    /// buffers, then initializes every registered shader and renderable and
    /// the camera.
    ///
    /// The first failing step aborts. Shaders, renderables and the camera
    /// then drop whatever GPU state they got, so nothing refers to the
    /// discarded device.
    pub fn initialize<W: RenderWindow>(&mut self, window: Arc<W>) -> Result<()> {
        anyhow::ensure!(self.gpu.is_none(), "renderer is already initialized");
        if let Err(err) = self.try_initialize(window) {
            self.release_objects();
            return Err(err);
        }
        Ok(())
    }

    fn try_initialize<W: RenderWindow>(&mut self, window: Arc<W>) -> Result<()> {
        let (width, height) = window.client_size();
        anyhow::ensure!(
            width > 0 && height > 0,
            "window client area is empty ({width}x{height})"
        );

        let gpu = pollster::block_on(Gpu::new(window, &self.init))?;
        let device = gpu.device();
        let queue = gpu.queue();

        let layouts = BindLayouts::new(device);

        let projection = Projection::for_client_area(width, height);
        let resize_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen on-resize cb"),
            contents: bytemuck::bytes_of(&CbChangeOnResize::new(projection.matrix())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen lights cb"),
            contents: bytemuck::bytes_of(&CbLights::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        for (name, shader) in self.vertex_shaders.iter_mut() {
            shader
                .initialize(device)
                .with_context(|| format!("vertex shader `{name}`"))?;
        }
        for (name, shader) in self.pixel_shaders.iter_mut() {
            shader
                .initialize(device)
                .with_context(|| format!("pixel shader `{name}`"))?;
        }

        let ctx = GpuCtx::new(device, queue, &layouts);
        for (name, renderable) in self.renderables.iter_mut() {
            renderable
                .initialize(&ctx)
                .with_context(|| format!("renderable `{name}`"))?;
        }

        self.camera.initialize(device)?;
        let camera_buffer = self
            .camera
            .constant_buffer()
            .context("camera has no constant buffer")?;
        queue.write_buffer(camera_buffer, 0, bytemuck::bytes_of(&self.camera.constants()));

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen frame bind group"),
            layout: &layouts.frame,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: CAMERA_BINDING,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: RESIZE_BINDING,
                    resource: resize_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: LIGHTS_BINDING,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let pipelines = PipelineCache::new(gpu.surface_format());

        log::info!(
            "renderer initialized: {} renderables, {} vertex shaders, {} pixel shaders, {width}x{height}",
            self.renderables.len(),
            self.vertex_shaders.len(),
            self.pixel_shaders.len(),
        );

        self.projection = projection;
        self.gpu = Some(GpuResources {
            gpu,
            layouts,
            resize_buffer,
            lights_buffer,
            frame_bind_group,
            pipelines,
            warned: HashSet::new(),
        });
        Ok(())
    }

    fn release_objects(&mut self) {
        for shader in self.vertex_shaders.values_mut() {
            shader.release();
        }
        for shader in self.pixel_shaders.values_mut() {
            shader.release();
        }
        for renderable in self.renderables.values_mut() {
            renderable.release();
        }
        self.camera.release();
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    /// Rebuilds size-dependent resources after the window changed size.
    ///
    /// A zero-sized (minimized) window is ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(res) = self.gpu.as_mut() else {
            return;
        };
        if !res.gpu.resize(width, height) {
            return;
        }

        self.projection = Projection::for_client_area(width, height);
        res.gpu.queue().write_buffer(
            &res.resize_buffer,
            0,
            bytemuck::bytes_of(&CbChangeOnResize::new(self.projection.matrix())),
        );
        log::debug!("resized to {width}x{height}");
    }

    pub fn add_renderable(
        &mut self,
        name: impl Into<Name>,
        renderable: Renderable,
    ) -> Result<(), RegistryError> {
        self.renderables.insert(name.into(), renderable)
    }

    pub fn add_vertex_shader(
        &mut self,
        name: impl Into<Name>,
        shader: VertexShader,
    ) -> Result<(), RegistryError> {
        self.vertex_shaders.insert(name.into(), shader)
    }

    pub fn add_pixel_shader(
        &mut self,
        name: impl Into<Name>,
        shader: PixelShader,
    ) -> Result<(), RegistryError> {
        self.pixel_shaders.insert(name.into(), shader)
    }

    /// Puts `light` into slot `index`, replacing any previous light.
    pub fn add_point_light(&mut self, index: usize, light: PointLight) -> Result<(), RegistryError> {
        let slot = self
            .point_lights
            .get_mut(index)
            .ok_or(RegistryError::LightIndexOutOfRange {
                index,
                capacity: NUM_LIGHTS,
            })?;
        *slot = Some(light);
        Ok(())
    }

    /// Empties slot `index`, returning the light it held.
    pub fn clear_point_light(&mut self, index: usize) -> Result<Option<PointLight>, RegistryError> {
        let slot = self
            .point_lights
            .get_mut(index)
            .ok_or(RegistryError::LightIndexOutOfRange {
                index,
                capacity: NUM_LIGHTS,
            })?;
        Ok(slot.take())
    }

    pub fn set_vertex_shader_of_renderable(
        &mut self,
        renderable: &str,
        vertex_shader: &str,
    ) -> Result<(), RegistryError> {
        if !self.renderables.contains(renderable) {
            return Err(RegistryError::UnknownRenderable(renderable.into()));
        }
        let shader = self
            .vertex_shaders
            .key(vertex_shader)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownVertexShader(vertex_shader.into()))?;
        if let Some(r) = self.renderables.get_mut(renderable) {
            r.set_vertex_shader(shader);
        }
        Ok(())
    }

    pub fn set_pixel_shader_of_renderable(
        &mut self,
        renderable: &str,
        pixel_shader: &str,
    ) -> Result<(), RegistryError> {
        if !self.renderables.contains(renderable) {
            return Err(RegistryError::UnknownRenderable(renderable.into()));
        }
        let shader = self
            .pixel_shaders
            .key(pixel_shader)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownPixelShader(pixel_shader.into()))?;
        if let Some(r) = self.renderables.get_mut(renderable) {
            r.set_pixel_shader(shader);
        }
        Ok(())
    }

    /// Initializes a renderable registered after [`Renderer::initialize`].
    pub fn initialize_renderable(&mut self, name: &str) -> Result<()> {
        let res = self.gpu.as_ref().context("renderer is not initialized")?;
        let renderable = self
            .renderables
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownRenderable(name.into()))?;
        renderable
            .initialize(&GpuCtx::new(res.gpu.device(), res.gpu.queue(), &res.layouts))
            .with_context(|| format!("renderable `{name}`"))
    }

    /// Initializes a vertex shader registered after [`Renderer::initialize`].
    pub fn initialize_vertex_shader(&mut self, name: &str) -> Result<()> {
        let res = self.gpu.as_ref().context("renderer is not initialized")?;
        let shader = self
            .vertex_shaders
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownVertexShader(name.into()))?;
        shader
            .initialize(res.gpu.device())
            .with_context(|| format!("vertex shader `{name}`"))
    }

    /// Initializes a pixel shader registered after [`Renderer::initialize`].
    pub fn initialize_pixel_shader(&mut self, name: &str) -> Result<()> {
        let res = self.gpu.as_ref().context("renderer is not initialized")?;
        let shader = self
            .pixel_shaders
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownPixelShader(name.into()))?;
        shader
            .initialize(res.gpu.device())
            .with_context(|| format!("pixel shader `{name}`"))
    }

    /// Forwards input to the camera.
    pub fn handle_input(
        &mut self,
        directions: &DirectionsInput,
        mouse: &MouseRelativeMovement,
        delta_time: f32,
    ) {
        self.camera.handle_input(directions, mouse, delta_time);
    }

    /// Runs every [`UpdateStage`] in [`UpdateStage::ORDER`].
    pub fn update(&mut self, delta_time: f32) {
        for stage in UpdateStage::ORDER {
            self.update_stage(stage, delta_time);
        }
    }

    /// Advances one part of the scene. Light stages visit populated slots only.
    pub fn update_stage(&mut self, stage: UpdateStage, delta_time: f32) {
        match stage {
            UpdateStage::Renderables => {
                for renderable in self.renderables.values_mut() {
                    renderable.update(delta_time);
                }
            }
            UpdateStage::Lights => {
                for light in self.point_lights.iter_mut().flatten() {
                    light.update(delta_time);
                }
            }
            UpdateStage::Camera => self.camera.update(delta_time),
        }
    }

    /// Constant-buffer payloads for the current state.
    pub fn frame_data(&self) -> FrameData {
        FrameData {
            camera: self.camera.constants(),
            lights: pack_lights(&self.point_lights),
            objects: self
                .renderables
                .iter()
                .map(|(name, r)| (name.clone(), r.constants()))
                .collect(),
        }
    }

    /// Payloads and draw list for the current state. Touches neither the GPU
    /// nor any scene object.
    pub fn plan_frame(&self) -> FramePlan {
        let mut draws = Vec::with_capacity(self.renderables.len());
        let mut skipped = Vec::new();
        for (name, renderable) in self.renderables.iter() {
            match draw_key(renderable, &self.vertex_shaders, &self.pixel_shaders) {
                Ok(key) => draws.push((name.clone(), key)),
                Err(reason) => skipped.push((name.clone(), reason)),
            }
        }
        FramePlan {
            data: self.frame_data(),
            draws,
            skipped,
        }
    }

    /// Uploads this frame's constants, draws every drawable renderable in
    /// registry order and presents.
    ///
    /// Renderables that cannot be drawn (see [`Renderer::plan_frame`]) or
    /// whose pipeline the device rejects are skipped with a warning. A lost
    /// or outdated surface skips the frame; only an unrecoverable surface
    /// error is returned.
    pub fn render(&mut self) -> Result<()> {
        let plan = self.plan_frame();
        let res = self.gpu.as_mut().context("renderer is not initialized")?;

        for (name, reason) in &plan.skipped {
            warn_once(&mut res.warned, name, reason);
        }

        let mut draws = Vec::with_capacity(plan.draws.len());
        for (name, key) in plan.draws {
            let (Some(vs), Some(ps)) = (
                self.vertex_shaders.get(key.vertex.as_str()),
                self.pixel_shaders.get(key.pixel.as_str()),
            ) else {
                continue;
            };
            match res.pipelines.ensure(res.gpu.device(), &res.layouts, &key, vs, ps) {
                Ok(()) => {
                    res.warned.remove(&name);
                    draws.push((name, key));
                }
                Err(err) => warn_once(&mut res.warned, &name, &format!("{err:#}")),
            }
        }

        let mut frame = match res.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match res.gpu.handle_surface_error(&err) {
                    SurfaceErrorAction::Fatal => Err(anyhow::anyhow!("surface error: {err}")),
                    action => {
                        log::debug!("frame skipped ({action:?}): {err}");
                        Ok(())
                    }
                };
            }
        };

        let queue = res.gpu.queue();
        if let Some(camera_buffer) = self.camera.constant_buffer() {
            queue.write_buffer(camera_buffer, 0, bytemuck::bytes_of(&plan.data.camera));
        }
        queue.write_buffer(&res.lights_buffer, 0, bytemuck::bytes_of(&plan.data.lights));
        for (name, constants) in &plan.data.objects {
            if let Some(renderable) = self.renderables.get(name.as_str()) {
                renderable.write_constants(queue, constants);
            }
        }

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen forward pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.init.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: res.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let (width, height) = res.gpu.size();
            rpass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            rpass.set_bind_group(FRAME_GROUP, &res.frame_bind_group, &[]);

            for (name, key) in &draws {
                let (Some(renderable), Some(pipeline)) =
                    (self.renderables.get(name.as_str()), res.pipelines.get(key))
                else {
                    continue;
                };
                rpass.set_pipeline(pipeline);
                renderable.draw(&mut rpass);
            }
        }

        res.gpu.submit(frame);
        Ok(())
    }

    pub fn renderable(&self, name: &str) -> Option<&Renderable> {
        self.renderables.get(name)
    }

    pub fn renderable_mut(&mut self, name: &str) -> Option<&mut Renderable> {
        self.renderables.get_mut(name)
    }

    pub fn renderables(&self) -> &Registry<Renderable> {
        &self.renderables
    }

    pub fn vertex_shader(&self, name: &str) -> Option<&VertexShader> {
        self.vertex_shaders.get(name)
    }

    pub fn pixel_shader(&self, name: &str) -> Option<&PixelShader> {
        self.pixel_shaders.get(name)
    }

    pub fn point_light(&self, index: usize) -> Option<&PointLight> {
        self.point_lights.get(index)?.as_ref()
    }

    pub fn point_light_mut(&mut self, index: usize) -> Option<&mut PointLight> {
        self.point_lights.get_mut(index)?.as_mut()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn init(&self) -> &RendererInit {
        &self.init
    }

    /// Driver type chosen by `initialize`.
    pub fn driver_type(&self) -> Option<DriverType> {
        self.gpu.as_ref().map(|r| r.gpu.driver_type())
    }

    pub fn feature_level(&self) -> Option<FeatureLevel> {
        self.gpu.as_ref().map(|r| r.gpu.feature_level())
    }

    pub fn swap_chain_path(&self) -> Option<SwapChainPath> {
        self.gpu.as_ref().map(|r| r.gpu.swap_chain_path())
    }

    pub fn adapter_info(&self) -> Option<wgpu::AdapterInfo> {
        self.gpu.as_ref().map(|r| r.gpu.adapter_info())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Order in which [`Renderer::update`] advances the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    Renderables,
    Lights,
    Camera,
}

impl UpdateStage {
    pub const ORDER: [UpdateStage; 3] = [Self::Renderables, Self::Lights, Self::Camera];
}

fn warn_once(warned: &mut HashSet<Name>, name: &Name, reason: &str) {
    if warned.insert(name.clone()) {
        log::warn!("skipping renderable `{name}`: {reason}");
    }
}

/// Pipeline key for `renderable`, or why it cannot be drawn.
fn draw_key(
    renderable: &Renderable,
    vertex_shaders: &Registry<VertexShader>,
    pixel_shaders: &Registry<PixelShader>,
) -> Result<PipelineKey, String> {
    let vertex = renderable.vertex_shader().ok_or("no vertex shader set")?;
    let pixel = renderable.pixel_shader().ok_or("no pixel shader set")?;

    let vs = vertex_shaders
        .get(vertex.as_str())
        .filter(|s| s.is_initialized())
        .ok_or_else(|| format!("vertex shader `{vertex}` is not initialized"))?;
    let ps = pixel_shaders
        .get(pixel.as_str())
        .filter(|s| s.is_initialized())
        .ok_or_else(|| format!("pixel shader `{pixel}` is not initialized"))?;
    if !renderable.is_initialized() {
        return Err("not initialized".into());
    }

    let textured = renderable.has_texture();
    check_bindings(textured, vs.info(), ps.info())?;

    Ok(PipelineKey {
        vertex: vertex.clone(),
        pixel: pixel.clone(),
        textured,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::{Vec3, Vec4};
    use raw_window_handle::{
        DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
    };

    use super::*;
    use crate::renderable::primitives;

    struct HeadlessWindow {
        size: (u32, u32),
    }

    impl HasWindowHandle for HeadlessWindow {
        fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
            Err(HandleError::Unavailable)
        }
    }

    impl HasDisplayHandle for HeadlessWindow {
        fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
            Err(HandleError::Unavailable)
        }
    }

    impl RenderWindow for HeadlessWindow {
        fn client_size(&self) -> (u32, u32) {
            self.size
        }
    }

    fn cube(color: Vec4) -> Renderable {
        let (v, i) = primitives::cube();
        Renderable::new(color).with_geometry(v, i)
    }

    fn light() -> PointLight {
        PointLight::new(Vec4::new(0.0, 5.0, 0.0, 1.0), Vec4::ONE)
    }

    #[test]
    fn duplicate_renderable_is_rejected_without_change() {
        let mut r = Renderer::new();
        r.add_renderable("cube", cube(Vec4::X)).unwrap();

        let err = r.add_renderable("cube", cube(Vec4::Y)).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("cube".into()));
        assert_eq!(r.renderables().len(), 1);
        assert_eq!(r.renderable("cube").unwrap().output_color(), Vec4::X);
    }

    #[test]
    fn duplicate_shaders_are_rejected() {
        let mut r = Renderer::new();
        r.add_vertex_shader("main", VertexShader::new("", "vs_main")).unwrap();
        r.add_pixel_shader("main", PixelShader::new("", "fs_main")).unwrap();

        assert!(r.add_vertex_shader("main", VertexShader::new("", "other")).is_err());
        assert!(r.add_pixel_shader("main", PixelShader::new("", "other")).is_err());
        assert_eq!(r.vertex_shader("main").unwrap().entry_point(), "vs_main");
        assert_eq!(r.pixel_shader("main").unwrap().entry_point(), "fs_main");
    }

    #[test]
    fn light_index_out_of_range_leaves_slots_untouched() {
        let mut r = Renderer::new();
        r.add_point_light(0, light()).unwrap();

        let err = r.add_point_light(NUM_LIGHTS, light()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::LightIndexOutOfRange {
                index: NUM_LIGHTS,
                capacity: NUM_LIGHTS
            }
        );
        assert!(r.point_light(0).is_some());
        assert!(r.point_light(1).is_none());
    }

    #[test]
    fn light_slots_can_be_reassigned_and_cleared() {
        let mut r = Renderer::new();
        r.add_point_light(1, light()).unwrap();
        r.add_point_light(1, PointLight::new(Vec4::ZERO, Vec4::X)).unwrap();
        assert_eq!(r.point_light(1).unwrap().color(), Vec4::X);

        assert!(r.clear_point_light(1).unwrap().is_some());
        assert!(r.point_light(1).is_none());
        assert!(r.clear_point_light(NUM_LIGHTS).is_err());
    }

    #[test]
    fn shader_binding_checks_both_names() {
        let mut r = Renderer::new();
        r.add_renderable("cube", cube(Vec4::ONE)).unwrap();
        r.add_vertex_shader("vs", VertexShader::new("", "vs_main")).unwrap();
        r.add_pixel_shader("ps", PixelShader::new("", "fs_main")).unwrap();

        assert_eq!(
            r.set_vertex_shader_of_renderable("sphere", "vs"),
            Err(RegistryError::UnknownRenderable("sphere".into()))
        );
        assert_eq!(
            r.set_vertex_shader_of_renderable("cube", "ps"),
            Err(RegistryError::UnknownVertexShader("ps".into()))
        );
        // A vertex shader name must not satisfy the pixel lookup.
        assert_eq!(
            r.set_pixel_shader_of_renderable("cube", "vs"),
            Err(RegistryError::UnknownPixelShader("vs".into()))
        );
        assert!(r.renderable("cube").unwrap().pixel_shader().is_none());

        r.set_vertex_shader_of_renderable("cube", "vs").unwrap();
        r.set_pixel_shader_of_renderable("cube", "ps").unwrap();
        let cube = r.renderable("cube").unwrap();
        assert_eq!(cube.vertex_shader().map(Name::as_str), Some("vs"));
        assert_eq!(cube.pixel_shader().map(Name::as_str), Some("ps"));
    }

    #[test]
    fn update_visits_renderables_then_lights_once_each() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut r = Renderer::new();

        for name in ["a", "b"] {
            let log = log.clone();
            r.add_renderable(name, cube(Vec4::ONE).with_update(move |_, _| log.borrow_mut().push(name)))
                .unwrap();
        }
        let light_log = log.clone();
        r.add_point_light(
            1,
            light().with_update(move |_, _| light_log.borrow_mut().push("light")),
        )
        .unwrap();

        r.update(0.016);
        assert_eq!(*log.borrow(), ["a", "b", "light"]);
    }

    #[test]
    fn camera_moves_only_in_the_last_stage() {
        assert_eq!(
            UpdateStage::ORDER,
            [UpdateStage::Renderables, UpdateStage::Lights, UpdateStage::Camera]
        );

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut r = Renderer::new();
        let object_log = log.clone();
        r.add_renderable(
            "cube",
            cube(Vec4::ONE).with_update(move |_, _| object_log.borrow_mut().push("cube")),
        )
        .unwrap();
        let light_log = log.clone();
        r.add_point_light(0, light().with_update(move |_, _| light_log.borrow_mut().push("light")))
            .unwrap();

        let front = DirectionsInput {
            front: true,
            ..Default::default()
        };
        r.handle_input(&front, &MouseRelativeMovement::default(), 0.1);
        let start = r.camera().eye();

        r.update_stage(UpdateStage::Renderables, 0.1);
        r.update_stage(UpdateStage::Lights, 0.1);
        assert_eq!(*log.borrow(), ["cube", "light"]);
        assert_eq!(r.camera().eye(), start);

        r.update_stage(UpdateStage::Camera, 0.1);
        assert_eq!(*log.borrow(), ["cube", "light"]);
        assert!(r.camera().eye().z > start.z);
    }

    #[test]
    fn update_moves_camera_after_input() {
        let mut r = Renderer::new();
        let front = DirectionsInput {
            front: true,
            ..Default::default()
        };
        r.handle_input(&front, &MouseRelativeMovement::default(), 0.1);
        r.update(0.1);
        assert!(r.camera().eye().z > -3.0);
    }

    fn populated() -> Renderer {
        let mut r = Renderer::new();
        r.add_vertex_shader("vs", VertexShader::new("", "vs_main")).unwrap();
        r.add_pixel_shader("ps", PixelShader::new("", "fs_main")).unwrap();

        let mut spinning = cube(Vec4::ONE).with_update(|t, dt| t.rotate_y(dt));
        spinning.translate(Vec3::new(0.0, 1.0, 0.0));
        r.add_renderable("spinning", spinning).unwrap();
        r.add_renderable("still", cube(Vec4::X)).unwrap();
        r.add_renderable("half", cube(Vec4::Y)).unwrap();

        r.set_vertex_shader_of_renderable("spinning", "vs").unwrap();
        r.set_pixel_shader_of_renderable("spinning", "ps").unwrap();
        r.set_vertex_shader_of_renderable("half", "vs").unwrap();
        r.add_point_light(0, PointLight::rotating(Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::ONE, 1.0))
            .unwrap();
        r
    }

    #[test]
    fn planning_a_frame_is_a_pure_read() {
        let r = populated();
        let before = r.frame_data();
        let world = r.renderable("spinning").unwrap().world();
        let light_position = r.point_light(0).unwrap().position();

        let plan = r.plan_frame();
        let again = r.plan_frame();

        assert_eq!(plan, again);
        assert_eq!(plan.data, before);
        assert_eq!(r.frame_data(), before);
        assert_eq!(r.renderable("spinning").unwrap().world(), world);
        assert_eq!(r.point_light(0).unwrap().position(), light_position);

        let names: Vec<&str> = plan.data.objects.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["spinning", "still", "half"]);
        assert_eq!(plan.data.objects[0].1.world[3], [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(plan.data.lights.light_colors[1], [0.0; 4]);
    }

    #[test]
    fn renderables_without_usable_shaders_are_not_drawn() {
        let r = populated();
        let plan = r.plan_frame();

        assert_eq!(plan.drawn().count(), 0);
        let reasons: Vec<(&str, &str)> = plan
            .skipped
            .iter()
            .map(|(n, why)| (n.as_str(), why.as_str()))
            .collect();
        assert_eq!(
            reasons,
            [
                ("spinning", "vertex shader `vs` is not initialized"),
                ("still", "no vertex shader set"),
                ("half", "no pixel shader set"),
            ]
        );
    }

    #[test]
    fn render_requires_initialize() {
        let mut r = populated();
        let err = r.render().unwrap_err();
        assert!(err.to_string().contains("not initialized"));
    }

    #[test]
    fn failed_initialize_leaves_objects_uninitialized() {
        let mut r = populated();
        assert!(r.initialize(Arc::new(HeadlessWindow { size: (0, 0) })).is_err());

        assert!(!r.is_initialized());
        assert!(r.camera().constant_buffer().is_none());
        assert!(!r.vertex_shader("vs").unwrap().is_initialized());
        assert!(r.renderables().iter().all(|(_, o)| !o.is_initialized()));
    }

    #[test]
    fn zero_sized_window_fails_initialize() {
        let mut r = Renderer::new();
        let err = r
            .initialize(Arc::new(HeadlessWindow { size: (0, 600) }))
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert!(!r.is_initialized());
        assert!(r.driver_type().is_none());
        assert!(r.swap_chain_path().is_none());
    }

    #[test]
    fn per_object_initialization_requires_initialized_renderer() {
        let mut r = Renderer::new();
        r.add_renderable("cube", cube(Vec4::ONE)).unwrap();
        assert!(r.initialize_renderable("cube").is_err());
        assert!(r.initialize_vertex_shader("vs").is_err());
        assert!(!r.renderable("cube").unwrap().is_initialized());
    }

    #[test]
    fn resize_before_initialize_is_ignored() {
        let mut r = Renderer::new();
        r.resize(800, 600);
        assert_eq!(r.projection().client_size(), (0, 0));
    }
}
