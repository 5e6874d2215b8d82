//! The textured-sprite shader program.
//!
//! A program is a WGSL vertex stage and a WGSL fragment stage loaded from two
//! files. Both are parsed and validated with naga before wgpu sees them, so a
//! broken shader surfaces as a `ShaderError` at startup instead of a device
//! error later.
//!
//! Interface expected from the sources:
//! - vertex entry `vs_main` with inputs at `POSITION_ATTRIBUTE` and
//!   `TEX_COORD_ATTRIBUTE` (both `vec2<f32>`)
//! - group 0, binding 0: uniform `{ model, view, projection: mat4x4<f32> }`
//! - fragment entry `fs_main`
//! - group 1: binding 0 `texture_2d<f32>`, binding 1 `sampler`
//! - every fragment `@location` input is written by the vertex stage

use std::fmt;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::transform::ViewProjection;

use super::RenderCtx;

pub const POSITION_ATTRIBUTE: u32 = 0;
pub const TEX_COORD_ATTRIBUTE: u32 = 1;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn entry_point(self) -> &'static str {
        match self {
            Self::Vertex => VERTEX_ENTRY,
            Self::Fragment => FRAGMENT_ENTRY,
        }
    }

    fn naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug)]
pub enum ShaderError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
    Validation {
        path: PathBuf,
        message: String,
    },
    MissingEntryPoint {
        path: PathBuf,
        stage: ShaderStage,
    },
    MissingAttribute {
        path: PathBuf,
        location: u32,
    },
    /// A resource binding the sprite pipeline layout does not provide to
    /// this stage.
    UnexpectedBinding {
        path: PathBuf,
        stage: ShaderStage,
        group: u32,
        binding: u32,
    },
    /// The two stages do not fit together, or wgpu rejected the pipeline.
    Link {
        message: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read shader {}: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "shader {} failed to parse:\n{message}", path.display())
            }
            Self::Validation { path, message } => {
                write!(f, "shader {} failed validation:\n{message}", path.display())
            }
            Self::MissingEntryPoint { path, stage } => write!(
                f,
                "shader {} has no {stage} entry point `{}`",
                path.display(),
                stage.entry_point()
            ),
            Self::MissingAttribute { path, location } => write!(
                f,
                "shader {} does not read vertex attribute @location({location})",
                path.display()
            ),
            Self::UnexpectedBinding {
                path,
                stage,
                group,
                binding,
            } => write!(
                f,
                "shader {} uses @group({group}) @binding({binding}), which the sprite layout \
                 does not provide to the {stage} stage",
                path.display()
            ),
            Self::Link { message } => write!(f, "shader program failed to link: {message}"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Bind group holding the model/view/projection uniform (vertex stage).
pub const MATRICES_GROUP: u32 = 0;
/// Bind group holding the sprite texture and sampler (fragment stage).
pub const TEXTURE_GROUP: u32 = 1;

/// What a validated stage reads and writes, for linking.
#[derive(Debug)]
struct StageInterface {
    inputs: Vec<u32>,
    outputs: Vec<u32>,
}

/// Parses and validates one stage's WGSL source.
///
/// `path` only labels errors. The vertex stage must also consume both sprite
/// vertex attributes, and each stage may only use the bindings the sprite
/// pipeline layout gives it.
pub fn validate_source(path: &Path, source: &str, stage: ShaderStage) -> Result<(), ShaderError> {
    check_stage(path, source, stage).map(drop)
}

/// Validates both stages, then checks that every fragment input is written
/// by the vertex stage.
pub fn validate_program(
    vertex: (&Path, &str),
    fragment: (&Path, &str),
) -> Result<(), ShaderError> {
    let vs = check_stage(vertex.0, vertex.1, ShaderStage::Vertex)?;
    let fs = check_stage(fragment.0, fragment.1, ShaderStage::Fragment)?;

    if let Some(location) = fs.inputs.iter().find(|l| !vs.outputs.contains(l)) {
        return Err(ShaderError::Link {
            message: format!(
                "{} reads @location({location}), which {} never writes",
                fragment.0.display(),
                vertex.0.display()
            ),
        });
    }
    Ok(())
}

fn check_stage(
    path: &Path,
    source: &str,
    stage: ShaderStage,
) -> Result<StageInterface, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        path: path.to_path_buf(),
        message: e.emit_to_string(source),
    })?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Validation {
        path: path.to_path_buf(),
        message: e.emit_to_string(source),
    })?;

    let (index, entry) = module
        .entry_points
        .iter()
        .enumerate()
        .find(|(_, ep)| ep.stage == stage.naga() && ep.name == stage.entry_point())
        .ok_or_else(|| ShaderError::MissingEntryPoint {
            path: path.to_path_buf(),
            stage,
        })?;

    // Only globals the entry point touches end up in the pipeline.
    let entry_info = info.get_entry_point(index);
    for (handle, var) in module.global_variables.iter() {
        let Some(rb) = &var.binding else { continue };
        if entry_info[handle].is_empty() || binding_allowed(stage, rb.group, rb.binding) {
            continue;
        }
        return Err(ShaderError::UnexpectedBinding {
            path: path.to_path_buf(),
            stage,
            group: rb.group,
            binding: rb.binding,
        });
    }

    let inputs = input_locations(&module, &entry.function);
    if stage == ShaderStage::Vertex {
        for location in [POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE] {
            if !inputs.contains(&location) {
                return Err(ShaderError::MissingAttribute {
                    path: path.to_path_buf(),
                    location,
                });
            }
        }
    }

    Ok(StageInterface {
        inputs,
        outputs: output_locations(&module, &entry.function),
    })
}

fn binding_allowed(stage: ShaderStage, group: u32, binding: u32) -> bool {
    match stage {
        ShaderStage::Vertex => group == MATRICES_GROUP && binding == 0,
        ShaderStage::Fragment => group == TEXTURE_GROUP && binding <= 1,
    }
}

fn location_of(binding: Option<&naga::Binding>) -> Option<u32> {
    match binding {
        Some(naga::Binding::Location { location, .. }) => Some(*location),
        _ => None,
    }
}

// User locations of a binding, or of the members of an unbound struct.
fn locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
) -> Vec<u32> {
    if binding.is_some() {
        return location_of(binding).into_iter().collect();
    }
    match &module.types[ty].inner {
        naga::TypeInner::Struct { members, .. } => members
            .iter()
            .filter_map(|m| location_of(m.binding.as_ref()))
            .collect(),
        _ => Vec::new(),
    }
}

fn input_locations(module: &naga::Module, function: &naga::Function) -> Vec<u32> {
    function
        .arguments
        .iter()
        .flat_map(|arg| locations(module, arg.ty, arg.binding.as_ref()))
        .collect()
}

fn output_locations(module: &naga::Module, function: &naga::Function) -> Vec<u32> {
    function
        .result
        .as_ref()
        .map(|r| locations(module, r.ty, r.binding.as_ref()))
        .unwrap_or_default()
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MatrixUniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

impl Default for MatrixUniforms {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            model: identity,
            view: identity,
            projection: identity,
        }
    }
}

/// Compiled vertex + fragment stages and the matrix uniforms they share.
///
/// All three matrices start as identity. View and projection are usually
/// set once; the model matrix is rewritten every frame.
pub struct ShaderProgram {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,

    matrices_layout: wgpu::BindGroupLayout,
    matrices_ubo: wgpu::Buffer,
    matrices_bind_group: wgpu::BindGroup,

    texture_layout: wgpu::BindGroupLayout,
}

impl ShaderProgram {
    /// Reads, validates and compiles both stages.
    pub fn load(
        ctx: &RenderCtx<'_>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let (vertex_path, fragment_path) = (vertex_path.as_ref(), fragment_path.as_ref());

        let vertex_src = read_source(vertex_path)?;
        let fragment_src = read_source(fragment_path)?;
        validate_program((vertex_path, &vertex_src), (fragment_path, &fragment_src))?;

        let vertex = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite vertex shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_src.into()),
        });
        let fragment = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite fragment shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_src.into()),
        });

        let matrices_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("sprite matrices bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<MatrixUniforms>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let texture_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("sprite texture bgl"),
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
                    ],
                });

        let matrices_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite matrices ubo"),
            contents: bytemuck::bytes_of(&MatrixUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let matrices_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite matrices bind group"),
            layout: &matrices_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: matrices_ubo.as_entire_binding(),
            }],
        });

        log::info!(
            "compiled shader program ({}, {})",
            vertex_path.display(),
            fragment_path.display()
        );

        Ok(Self {
            vertex,
            fragment,
            matrices_layout,
            matrices_ubo,
            matrices_bind_group,
            texture_layout,
        })
    }

    pub fn set_model_matrix(&self, queue: &wgpu::Queue, model: &Mat4) {
        self.write_matrix(queue, std::mem::offset_of!(MatrixUniforms, model), model);
    }

    pub fn set_view_matrix(&self, queue: &wgpu::Queue, view: &Mat4) {
        self.write_matrix(queue, std::mem::offset_of!(MatrixUniforms, view), view);
    }

    pub fn set_projection_matrix(&self, queue: &wgpu::Queue, projection: &Mat4) {
        self.write_matrix(
            queue,
            std::mem::offset_of!(MatrixUniforms, projection),
            projection,
        );
    }

    /// Uploads both static camera matrices.
    pub fn set_view_projection(&self, queue: &wgpu::Queue, vp: &ViewProjection) {
        self.set_view_matrix(queue, &vp.view);
        self.set_projection_matrix(queue, &vp.projection);
    }

    fn write_matrix(&self, queue: &wgpu::Queue, offset: usize, m: &Mat4) {
        let cols = m.to_cols_array_2d();
        queue.write_buffer(&self.matrices_ubo, offset as u64, bytemuck::bytes_of(&cols));
    }

    pub(crate) fn vertex_module(&self) -> &wgpu::ShaderModule {
        &self.vertex
    }

    pub(crate) fn fragment_module(&self) -> &wgpu::ShaderModule {
        &self.fragment
    }

    pub(crate) fn matrices_layout(&self) -> &wgpu::BindGroupLayout {
        &self.matrices_layout
    }

    pub(crate) fn matrices_bind_group(&self) -> &wgpu::BindGroup {
        &self.matrices_bind_group
    }

    pub(crate) fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
struct Matrices {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> matrices: Matrices;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) tex_coord: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = matrices.projection * matrices.view * matrices.model * vec4<f32>(position, 0.0, 1.0);
    out.tex_coord = tex_coord;
    return out;
}
"#;

    fn path() -> &'static Path {
        Path::new("inline.wgsl")
    }

    #[test]
    fn valid_vertex_stage_passes() {
        validate_source(path(), VERTEX, ShaderStage::Vertex).expect("valid shader");
    }

    #[test]
    fn wrong_stage_reports_missing_entry_point() {
        let err = validate_source(path(), VERTEX, ShaderStage::Fragment).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::MissingEntryPoint {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
        assert!(err.to_string().contains("fs_main"));
    }

    #[test]
    fn syntax_error_is_a_parse_error() {
        let err = validate_source(path(), "fn vs_main( {", ShaderStage::Vertex).unwrap_err();
        assert!(matches!(err, ShaderError::Parse { .. }));
    }

    #[test]
    fn type_error_is_a_validation_or_parse_error() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let err = validate_source(path(), src, ShaderStage::Fragment).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Parse { .. } | ShaderError::Validation { .. }
        ));
    }

    #[test]
    fn vertex_stage_must_read_tex_coords() {
        let src = r#"
@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 0.0, 1.0);
}
"#;
        let err = validate_source(path(), src, ShaderStage::Vertex).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::MissingAttribute {
                location: TEX_COORD_ATTRIBUTE,
                ..
            }
        ));
    }

    #[test]
    fn struct_inputs_count_as_attributes() {
        let src = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> @builtin(position) vec4<f32> {
    return vec4<f32>(in.position + in.tex_coord, 0.0, 1.0);
}
"#;
        validate_source(path(), src, ShaderStage::Vertex).expect("struct inputs");
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let err = read_source(Path::new("no/such/shader.wgsl")).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }

    const FRAGMENT: &str = r#"
@group(1) @binding(0) var sprite_texture: texture_2d<f32>;
@group(1) @binding(1) var sprite_sampler: sampler;

@fragment
fn fs_main(@location(0) tex_coord: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(sprite_texture, sprite_sampler, tex_coord);
}
"#;

    fn fragment_path() -> &'static Path {
        Path::new("inline_fragment.wgsl")
    }

    #[test]
    fn matching_stages_link() {
        validate_program((path(), VERTEX), (fragment_path(), FRAGMENT)).expect("linked program");
    }

    #[test]
    fn fragment_input_without_vertex_output_fails_to_link() {
        let fragment = FRAGMENT.replace("@location(0) tex_coord", "@location(5) tex_coord");
        validate_source(fragment_path(), &fragment, ShaderStage::Fragment)
            .expect("fragment stage is valid on its own");

        let err = validate_program((path(), VERTEX), (fragment_path(), &fragment)).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(err.to_string().contains("@location(5)"));
    }

    #[test]
    fn fragment_bindings_outside_texture_group_are_rejected() {
        let fragment = FRAGMENT
            .replace("@group(1) @binding(0)", "@group(2) @binding(7)")
            .replace("@group(1) @binding(1)", "@group(2) @binding(8)");
        let err = validate_source(fragment_path(), &fragment, ShaderStage::Fragment).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::UnexpectedBinding {
                stage: ShaderStage::Fragment,
                group: 2,
                binding: 7,
                ..
            }
        ));
    }

    #[test]
    fn vertex_stage_cannot_use_texture_group() {
        let src = r#"
@group(1) @binding(0) var<uniform> offset: vec4<f32>;

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) tex_coord: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position + tex_coord, 0.0, 1.0) + offset;
}
"#;
        let err = validate_source(path(), src, ShaderStage::Vertex).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::UnexpectedBinding {
                stage: ShaderStage::Vertex,
                group: TEXTURE_GROUP,
                binding: 0,
                ..
            }
        ));
    }

    #[test]
    fn unused_foreign_bindings_are_ignored() {
        let fragment = format!("@group(3) @binding(2) var<uniform> unused: vec4<f32>;\n{FRAGMENT}");
        validate_program((path(), VERTEX), (fragment_path(), &fragment)).expect("unused global");
    }

    #[test]
    fn matrix_offsets_follow_wgsl_layout() {
        assert_eq!(std::mem::offset_of!(MatrixUniforms, model), 0);
        assert_eq!(std::mem::offset_of!(MatrixUniforms, view), 64);
        assert_eq!(std::mem::offset_of!(MatrixUniforms, projection), 128);
        assert_eq!(std::mem::size_of::<MatrixUniforms>(), 192);
    }
}
