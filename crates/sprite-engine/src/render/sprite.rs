use wgpu::util::DeviceExt;

use super::quad::{vec2_layout, QUAD_POSITIONS, QUAD_TEX_COORDS, QUAD_VERTEX_COUNT};
use super::shader::{ShaderError, ShaderProgram, POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE};
use super::texture::Texture;
use super::{RenderCtx, RenderTarget};

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: 0,
    shader_location: POSITION_ATTRIBUTE,
}];

const TEX_COORD_ATTRS: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
    format: wgpu::VertexFormat::Float32x2,
    offset: 0,
    shader_location: TEX_COORD_ATTRIBUTE,
}];

/// Texture + sampler bound for group 1 of a [`ShaderProgram`].
pub struct SpriteBinding {
    bind_group: wgpu::BindGroup,
}

/// Draws one textured unit quad with straight alpha blending.
///
/// Quad positions and texture coordinates live in two vertex buffers that
/// are uploaded once at construction. The model matrix scales and places
/// the quad; it is read from the program's uniforms at draw time.
pub struct SpriteRenderer {
    pipeline: wgpu::RenderPipeline,
    positions: wgpu::Buffer,
    tex_coords: wgpu::Buffer,
}

impl SpriteRenderer {
    /// Builds the pipeline and uploads the quad.
    ///
    /// Pipeline creation runs inside a validation error scope, so a program
    /// whose stages wgpu refuses to combine is returned as
    /// [`ShaderError::Link`] rather than reported to the device's error
    /// handler.
    pub fn new(ctx: &RenderCtx<'_>, program: &ShaderProgram) -> Result<Self, ShaderError> {
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("sprite pipeline layout"),
                    bind_group_layouts: &[program.matrices_layout(), program.texture_layout()],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: program.vertex_module(),
                entry_point: Some(super::shader::VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[vec2_layout(&POSITION_ATTRS), vec2_layout(&TEX_COORD_ATTRS)],
            },

            fragment: Some(wgpu::FragmentState {
                module: program.fragment_module(),
                entry_point: Some(super::shader::FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    // SRC_ALPHA, ONE_MINUS_SRC_ALPHA
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ShaderError::Link {
                message: err.to_string(),
            });
        }

        let positions = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite quad positions"),
            contents: bytemuck::cast_slice(&QUAD_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let tex_coords = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite quad tex coords"),
            contents: bytemuck::cast_slice(&QUAD_TEX_COORDS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            pipeline,
            positions,
            tex_coords,
        })
    }

    /// Creates the group 1 bind group sampling `texture`.
    pub fn bind_texture(
        &self,
        ctx: &RenderCtx<'_>,
        program: &ShaderProgram,
        texture: &Texture,
    ) -> SpriteBinding {
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite texture bind group"),
            layout: program.texture_layout(),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });

        SpriteBinding { bind_group }
    }

    /// Records one quad draw over whatever the target already holds.
    pub fn draw(
        &self,
        target: &mut RenderTarget<'_>,
        program: &ShaderProgram,
        binding: &SpriteBinding,
    ) {
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, program.matrices_bind_group(), &[]);
        rpass.set_bind_group(1, &binding.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.positions.slice(..));
        rpass.set_vertex_buffer(1, self.tex_coords.slice(..));
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_streams_use_program_locations() {
        assert_eq!(POSITION_ATTRS[0].shader_location, POSITION_ATTRIBUTE);
        assert_eq!(TEX_COORD_ATTRS[0].shader_location, TEX_COORD_ATTRIBUTE);
        assert_ne!(POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE);
    }

    #[test]
    fn blend_is_straight_alpha() {
        let blend = wgpu::BlendState::ALPHA_BLENDING;
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
    }
}
