/// How the GPU context is requested and how the window's swapchain is set up.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Pick an sRGB swapchain format if the surface offers one. Sprite
    /// textures are sRGB, so this keeps their colours unchanged on screen.
    pub prefer_srgb: bool,

    /// `Fifo` presents on vertical sync and is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Requested compositing mode; ignored when the surface lacks it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    /// Lower bound on device limits. The adapter's texture resolution limits
    /// are applied on top so large sprites still load.
    pub required_limits: wgpu::Limits,

    /// Frames the swapchain may queue ahead (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::default(),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
