//! Diffuse textures: decoding plus GPU resource view and sampler creation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Where texel data comes from.
#[derive(Debug, Clone)]
pub enum TextureSource {
    /// Image file decoded with the `image` crate (PNG, JPEG, BMP, TGA).
    File(PathBuf),
    /// Tightly packed RGBA8 texels.
    Rgba8 {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
}

/// A 2D texture with its shader-resource view and sampler.
///
/// GPU objects exist only after [`Texture::initialize`] succeeds.
#[derive(Debug)]
pub struct Texture {
    source: TextureSource,
    gpu: Option<TextureGpu>,
}

#[derive(Debug)]
struct TextureGpu {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::from_source(TextureSource::File(path.into()))
    }

    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::from_source(TextureSource::Rgba8 {
            width,
            height,
            pixels,
        })
    }

    pub fn from_source(source: TextureSource) -> Self {
        Self { source, gpu: None }
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn is_initialized(&self) -> bool {
        self.gpu.is_some()
    }

    pub(crate) fn release(&mut self) {
        self.gpu = None;
    }

    /// Decodes the source into `(width, height, rgba8 texels)`.
    pub fn decode(&self) -> Result<(u32, u32, Vec<u8>)> {
        match &self.source {
            TextureSource::File(path) => decode_file(path),
            TextureSource::Rgba8 {
                width,
                height,
                pixels,
            } => {
                anyhow::ensure!(*width > 0 && *height > 0, "texture has zero size");
                let expected = *width as usize * *height as usize * 4;
                anyhow::ensure!(
                    pixels.len() == expected,
                    "texture data is {} bytes, expected {expected} for {width}x{height} RGBA8",
                    pixels.len()
                );
                Ok((*width, *height, pixels.clone()))
            }
        }
    }

    /// Uploads the texels and creates the resource view and a linear, wrapping sampler.
    pub fn initialize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<()> {
        let (width, height, pixels) = self.decode()?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen diffuse texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen linear sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        log::debug!("texture uploaded ({width}x{height})");

        self.gpu = Some(TextureGpu {
            _texture: texture,
            view,
            sampler,
        });
        Ok(())
    }

    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.gpu.as_ref().map(|g| &g.view)
    }

    pub fn sampler(&self) -> Option<&wgpu::Sampler> {
        self.gpu.as_ref().map(|g| &g.sampler)
    }
}

fn decode_file(path: &Path) -> Result<(u32, u32, Vec<u8>)> {
    let image = image::open(path)
        .with_context(|| format!("failed to load texture `{}`", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok((width, height, image.into_raw()))
}
