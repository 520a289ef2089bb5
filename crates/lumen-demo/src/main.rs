//! Lit cube scene: a spinning cube, two orbiting lights with marker cubes and
//! a textured cube. Pass an image path to texture it; otherwise a checkerboard
//! is used.

use anyhow::Result;
use glam::{Mat4, Vec3, Vec4};
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::renderable::primitives;
use lumen_engine::{
    Game, GameConfig, Material, PixelShader, PointLight, Renderable, Renderer, ShaderSource,
    Texture, VertexShader,
};

const COMMON: &str = include_str!("../shaders/common.wgsl");
const PHONG: &str = include_str!("../shaders/phong.wgsl");
const TEXTURED: &str = include_str!("../shaders/textured.wgsl");

/// Radians per second for the lights and their markers.
const LIGHT_SPEED: f32 = 1.0;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let texture = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("texturing cube with {path}");
            Texture::from_file(path)
        }
        None => checkerboard(64, 8),
    };

    let mut renderer = Renderer::new();
    register_shaders(&mut renderer)?;
    register_scene(&mut renderer, texture)?;

    let config = GameConfig {
        title: "lumen demo".to_string(),
        ..Default::default()
    };
    Game::new(config, renderer).run()
}

fn stage(source: &str) -> ShaderSource {
    ShaderSource::Wgsl(format!("{COMMON}\n{source}").into())
}

fn register_shaders(renderer: &mut Renderer) -> Result<()> {
    renderer.add_vertex_shader("phong", VertexShader::new(stage(PHONG), "vs_main"))?;
    renderer.add_pixel_shader("phong", PixelShader::new(stage(PHONG), "fs_main"))?;
    renderer.add_pixel_shader("solid", PixelShader::new(stage(PHONG), "fs_solid"))?;
    renderer.add_pixel_shader("textured", PixelShader::new(stage(TEXTURED), "fs_textured"))?;
    Ok(())
}

fn register_scene(renderer: &mut Renderer, texture: Texture) -> Result<()> {
    let (vertices, indices) = primitives::cube();

    let spinning = Renderable::new(Vec4::new(0.9, 0.6, 0.2, 1.0))
        .with_geometry(vertices.clone(), indices.clone())
        .with_update(|t, dt| t.rotate_y(dt));
    add(renderer, "spinning_cube", spinning, "phong")?;

    let mut angle = 0.0_f32;
    let textured = Renderable::new(Vec4::ONE)
        .with_geometry(vertices.clone(), indices.clone())
        .with_material(Material::with_diffuse(texture))
        .with_update(move |t, dt| {
            angle += dt * 0.5;
            t.set(Mat4::from_translation(Vec3::new(3.0, 0.0, 1.0)) * Mat4::from_rotation_x(angle));
        });
    add(renderer, "textured_cube", textured, "textured")?;

    let lights = [
        (Vec4::new(-5.0, 2.0, 0.0, 1.0), Vec4::new(0.5, 0.5, 1.0, 1.0)),
        (Vec4::new(5.0, -1.0, 0.0, 1.0), Vec4::new(1.0, 0.4, 0.4, 1.0)),
    ];
    for (i, (position, color)) in lights.into_iter().enumerate() {
        renderer.add_point_light(i, PointLight::rotating(position, color, LIGHT_SPEED))?;

        let mut marker = Renderable::new(color)
            .with_geometry(vertices.clone(), indices.clone())
            .with_update(|t, dt| t.rotate_y(LIGHT_SPEED * dt));
        marker.scale(0.1, 0.1, 0.1);
        marker.translate(position.truncate());
        add(renderer, &format!("light_marker_{i}"), marker, "solid")?;
    }

    Ok(())
}

fn add(renderer: &mut Renderer, name: &str, renderable: Renderable, pixel_shader: &str) -> Result<()> {
    renderer.add_renderable(name, renderable)?;
    renderer.set_vertex_shader_of_renderable(name, "phong")?;
    renderer.set_pixel_shader_of_renderable(name, pixel_shader)?;
    Ok(())
}

fn checkerboard(size: u32, cells: u32) -> Texture {
    let cell = (size / cells).max(1);
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = ((x / cell) + (y / cell)) % 2 == 0;
            let v = if light { 230 } else { 40 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Texture::from_rgba8(size, size, pixels)
}
