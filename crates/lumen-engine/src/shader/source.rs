use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// WGSL code, inline or read from disk at initialization.
#[derive(Debug, Clone)]
pub enum ShaderSource {
    Wgsl(Cow<'static, str>),
    File(PathBuf),
}

impl ShaderSource {
    pub fn load(&self) -> Result<Cow<'_, str>> {
        match self {
            Self::Wgsl(code) => Ok(Cow::Borrowed(code.as_ref())),
            Self::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .with_context(|| format!("failed to read shader `{}`", path.display())),
        }
    }

    /// Parses and validates the WGSL without a device and reports the bind
    /// groups `entry_point` reads.
    pub fn validate(&self, entry_point: &str, stage: naga::ShaderStage) -> Result<EntryPointInfo> {
        let code = self.load()?;
        reflect(&code, entry_point, stage)
    }

    /// Validates, then creates the module inside a validation error scope.
    pub(crate) fn compile(
        &self,
        device: &wgpu::Device,
        label: &str,
        entry_point: &str,
        stage: naga::ShaderStage,
    ) -> Result<(wgpu::ShaderModule, EntryPointInfo)> {
        let code = self.load()?;
        let info = reflect(&code, entry_point, stage).with_context(|| label.to_string())?;

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(code),
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            anyhow::bail!("{label} rejected by the device: {err}");
        }
        Ok((module, info))
    }
}

/// Bind groups one entry point actually reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPointInfo {
    groups: BTreeSet<u32>,
}

impl EntryPointInfo {
    pub fn uses_group(&self, group: u32) -> bool {
        self.groups.contains(&group)
    }

    pub fn groups(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.iter().copied()
    }
}

fn reflect(code: &str, entry_point: &str, stage: naga::ShaderStage) -> Result<EntryPointInfo> {
    let module = naga::front::wgsl::parse_str(code)
        .map_err(|e| anyhow::anyhow!("invalid WGSL:\n{}", e.emit_to_string(code)))?;
    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow::anyhow!("WGSL validation failed:\n{}", e.emit_to_string(code)))?;

    let index = module
        .entry_points
        .iter()
        .position(|ep| ep.name == entry_point && ep.stage == stage)
        .with_context(|| format!("no {stage:?} entry point named `{entry_point}`"))?;
    let function = info.get_entry_point(index);

    let groups = module
        .global_variables
        .iter()
        .filter(|&(handle, _)| !function[handle].is_empty())
        .filter_map(|(_, var)| var.binding.as_ref().map(|b| b.group))
        .collect();
    Ok(EntryPointInfo { groups })
}

impl From<&'static str> for ShaderSource {
    fn from(code: &'static str) -> Self {
        Self::Wgsl(Cow::Borrowed(code))
    }
}

impl From<PathBuf> for ShaderSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_source_loads_as_is() {
        let src = ShaderSource::from("@fragment fn fs_main() {}");
        assert_eq!(src.load().unwrap(), "@fragment fn fs_main() {}");
    }

    #[test]
    fn missing_file_reports_path() {
        let src = ShaderSource::File("no/such/shader.wgsl".into());
        let err = src.load().unwrap_err();
        assert!(format!("{err:#}").contains("no/such/shader.wgsl"));
    }

    const TEXTURED: &str = r#"
@group(0) @binding(0) var<uniform> tint: vec4<f32>;
@group(2) @binding(0) var diffuse: texture_2d<f32>;
@group(2) @binding(1) var diffuse_sampler: sampler;

@vertex
fn vs_main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
    return vec4<f32>(f32(i), 0.0, 0.0, 1.0);
}

@fragment
fn fs_flat() -> @location(0) vec4<f32> {
    return tint;
}

@fragment
fn fs_textured() -> @location(0) vec4<f32> {
    return textureSample(diffuse, diffuse_sampler, vec2<f32>(0.5, 0.5)) * tint;
}
"#;

    #[test]
    fn broken_wgsl_is_rejected() {
        let src = ShaderSource::from("fn broken(");
        let err = src.validate("vs_main", naga::ShaderStage::Vertex).unwrap_err();
        assert!(format!("{err:#}").contains("invalid WGSL"), "{err:#}");
    }

    #[test]
    fn type_errors_fail_validation() {
        let src = ShaderSource::from(
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }",
        );
        assert!(src.validate("fs_main", naga::ShaderStage::Fragment).is_err());
    }

    #[test]
    fn entry_point_must_exist_for_stage() {
        let src = ShaderSource::from(TEXTURED);
        assert!(src.validate("vs_main", naga::ShaderStage::Vertex).is_ok());

        let err = src.validate("vs_main", naga::ShaderStage::Fragment).unwrap_err();
        assert!(err.to_string().contains("`vs_main`"), "{err}");
        assert!(src.validate("fs_missing", naga::ShaderStage::Fragment).is_err());
    }

    #[test]
    fn groups_are_collected_per_entry_point() {
        let src = ShaderSource::from(TEXTURED);

        let flat = src.validate("fs_flat", naga::ShaderStage::Fragment).unwrap();
        assert_eq!(flat.groups().collect::<Vec<_>>(), [0]);

        let textured = src.validate("fs_textured", naga::ShaderStage::Fragment).unwrap();
        assert!(textured.uses_group(0));
        assert!(textured.uses_group(2));

        let vertex = src.validate("vs_main", naga::ShaderStage::Vertex).unwrap();
        assert_eq!(vertex, EntryPointInfo::default());
    }
}
