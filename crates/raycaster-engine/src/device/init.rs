/// Surface and device settings for the window backend.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Choose an sRGB surface format when one is offered.
    ///
    /// Off by default so 8-bit draw colors reach the screen unchanged.
    pub prefer_srgb: bool,

    /// FIFO by default, which every platform supports.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when `None` or unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    /// Also bounds the largest texture `load_texture` accepts.
    pub required_limits: wgpu::Limits,

    /// Hint only; honored where the backend supports it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
