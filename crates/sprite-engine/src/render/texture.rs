//! Sprite textures: decode an image file, upload it, sample it unfiltered.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::RenderCtx;

/// Failure to produce a texture. Always fatal for the caller's startup.
#[derive(Debug)]
pub enum TextureError {
    /// The file is missing, unreadable, corrupt or in an unsupported format.
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The image exceeds the device's 2D texture limit.
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, source } => {
                write!(f, "unable to load image {}: {source}", path.display())
            }
            Self::TooLarge {
                path,
                width,
                height,
                max,
            } => write!(
                f,
                "image {} is {width}x{height}, device limit is {max}x{max}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::TooLarge { .. } => None,
        }
    }
}

/// CPU-side RGBA8 pixels, rows top to bottom.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    /// Always 4: images are expanded to RGBA on decode.
    pub const CHANNELS: u32 = 4;

    pub fn bytes_per_row(&self) -> u32 {
        self.width * Self::CHANNELS
    }
}

/// Decodes an image file into RGBA8, whatever its stored channel layout.
pub fn decode_rgba(path: impl AsRef<Path>) -> Result<DecodedImage, TextureError> {
    let path = path.as_ref();
    let rgba = image::open(path)
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

/// Opaque identifier of a loaded texture, unique within the process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A GPU-resident texture with its view and nearest-neighbour sampler.
///
/// The GPU memory is owned by this value: it is freed by `release` or when
/// the value is dropped, whichever comes first.
pub struct Texture {
    id: TextureId,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture {
    /// Decodes `path` and uploads it to a new texture.
    ///
    /// Minification, magnification and mip filtering are all nearest, so
    /// pixel art stays crisp at any scale.
    pub fn load(ctx: &RenderCtx<'_>, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = decode_rgba(path)?;

        let max = ctx.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(TextureError::TooLarge {
                path: path.to_path_buf(),
                width: image.width,
                height: image.height,
                max,
            });
        }

        let id = TextureId::next();
        let texture = Self::upload(ctx, id, &image);

        // Only the GPU copy is needed from here on.
        let (width, height) = (image.width, image.height);
        drop(image);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        log::info!("loaded texture {id} from {} ({width}x{height})", path.display());

        Ok(Self {
            id,
            texture,
            view,
            sampler,
        })
    }

    fn upload(ctx: &RenderCtx<'_>, id: TextureId, image: &DecodedImage) -> wgpu::Texture {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let label = format!("sprite texture {id}");
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(image.height),
            },
            size,
        );

        texture
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Frees the GPU texture now rather than at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.texture.destroy();
        log::debug!("released texture {}", self.id);
    }
}
