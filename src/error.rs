use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(String),
    #[error("no OpenGL config matches the window")]
    NoGlConfig,
    #[error("window has zero size")]
    ZeroSizedWindow,
    #[error("OpenGL error: {0}")]
    Gl(#[from] glutin::error::Error),
    #[error("failed to initialise imgui renderer: {0}")]
    RendererInit(String),
    #[error("failed to render imgui draw data: {0}")]
    Render(String),
    #[error("failed to prepare imgui frame: {0}")]
    PrepareFrame(#[from] winit::error::ExternalError),
    #[error("failed to create texture: {0}")]
    TextureCreation(String),
    #[error("texture dimensions exceed the OpenGL limit")]
    TextureTooLarge,
    #[error("renderer texture map is full")]
    TextureRegistration,
}
