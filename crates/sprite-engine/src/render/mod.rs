//! GPU rendering subsystem.
//!
//! - `texture`: decode an image file and upload it as a sampled texture
//! - `shader`: load, validate and compile the WGSL program and own its
//!   matrix uniforms
//! - `sprite`: the textured-quad pipeline and its static geometry
//!
//! World space is +Y up; the shader program's projection maps it to clip space.

mod ctx;
mod quad;
pub mod shader;
mod sprite;
pub mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use shader::{ShaderError, ShaderProgram, ShaderStage};
pub use sprite::{SpriteBinding, SpriteRenderer};
pub use texture::{DecodedImage, Texture, TextureError, TextureId};
