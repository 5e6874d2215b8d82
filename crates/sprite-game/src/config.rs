use std::path::{Path, PathBuf};

use glam::Vec2;
use sprite_engine::input::KeyBindings;
use sprite_engine::transform::OrthoBox;
use sprite_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Everything the game needs to start. Override fields with struct update
/// syntax on top of `GameConfig::default()`.
///
/// Paths default to files shipped next to this crate's manifest, so the
/// binary runs from any working directory during development.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub window: RuntimeConfig,

    pub sprite_path: PathBuf,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,

    /// World units per second at full deflection.
    pub speed: f32,

    /// Size of the sprite quad in world units.
    pub sprite_scale: Vec2,

    pub projection: OrthoBox,

    /// Clear colour as straight sRGB components.
    pub background: [f32; 3],

    pub bindings: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        Self {
            window: RuntimeConfig {
                title: "Hello, Textures!".to_string(),
                initial_size: LogicalSize::new(640.0, 480.0),
                resizable: false,
            },
            sprite_path: root.join("assets/kita.png"),
            vertex_shader: root.join("shaders/vertex_textured.wgsl"),
            fragment_shader: root.join("shaders/fragment_textured.wgsl"),
            speed: 5.0,
            sprite_scale: Vec2::new(2.0, 3.8621),
            projection: OrthoBox::DEFAULT,
            background: [0.9765625, 0.97265625, 0.9609375],
            bindings: KeyBindings::default(),
        }
    }
}

impl GameConfig {
    /// Background as a clear colour for a surface of `format`.
    ///
    /// An sRGB surface encodes on write, so the clear value must be linear.
    /// Any other format stores the components as given.
    pub fn clear_color(&self, format: wgpu::TextureFormat) -> wgpu::Color {
        let [r, g, b] = if format.is_srgb() {
            self.background.map(srgb_to_linear)
        } else {
            self.background
        };
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_hello_textures_window() {
        let config = GameConfig::default();
        assert_eq!(config.window.title, "Hello, Textures!");
        assert_eq!(config.window.initial_size, LogicalSize::new(640.0, 480.0));
        assert_eq!(config.speed, 5.0);
        assert_eq!(config.sprite_scale, Vec2::new(2.0, 3.8621));
        assert!(config.sprite_path.ends_with("assets/kita.png"));
    }

    #[test]
    fn overrides_keep_remaining_defaults() {
        let config = GameConfig {
            speed: 2.5,
            sprite_path: PathBuf::from("a.png"),
            ..GameConfig::default()
        };

        assert_eq!(config.speed, 2.5);
        assert_eq!(config.sprite_path, PathBuf::from("a.png"));
        assert_eq!(config.window.title, "Hello, Textures!");
        assert!(config.vertex_shader.ends_with("shaders/vertex_textured.wgsl"));
    }

    #[test]
    fn clear_color_is_linearized_for_srgb_surface() {
        let config = GameConfig {
            background: [1.0, 0.0, 0.5],
            ..GameConfig::default()
        };
        let c = config.clear_color(wgpu::TextureFormat::Bgra8UnormSrgb);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.214).abs() < 1e-3);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn clear_color_is_passed_through_for_linear_surface() {
        let config = GameConfig {
            background: [1.0, 0.0, 0.5],
            ..GameConfig::default()
        };
        let c = config.clear_color(wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn default_background_keeps_channel_order() {
        let config = GameConfig::default();
        for format in [wgpu::TextureFormat::Rgba8UnormSrgb, wgpu::TextureFormat::Rgba8Unorm] {
            let c = config.clear_color(format);
            assert!(c.r > c.g && c.g > c.b);
        }
    }
}
