/// One acquired swapchain texture plus the encoder recording into it.
///
/// Hold it only for the frame: the next acquisition waits until this one is
/// presented through `Gpu::submit`.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
