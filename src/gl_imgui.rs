use clipboard_rs::{Clipboard, ClipboardContext};
use imgui::{ClipboardBackend, FontConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use winit::window::Window;

use crate::HostError;

pub fn init_imgui(
    window: &Window,
    gl: glow::Context,
    font_size: f64,
) -> Result<
    (
        imgui::Context,
        WinitPlatform,
        imgui_glow_renderer::AutoRenderer,
    ),
    HostError,
> {
    let mut imgui = imgui::Context::create();

    imgui.set_ini_filename(None);

    let mut platform = WinitPlatform::init(&mut imgui);
    let dpi_mode = HiDpiMode::Rounded;

    let hidpi_factor = platform.hidpi_factor();
    let font_size = (font_size * hidpi_factor) as f32;

    imgui
        .fonts()
        .add_font(&[imgui::FontSource::DefaultFontData {
            config: Some(FontConfig {
                size_pixels: font_size,
                ..FontConfig::default()
            }),
        }]);

    imgui.io_mut().font_global_scale = (1.0 / hidpi_factor) as f32;
    platform.attach_window(imgui.io_mut(), window, dpi_mode);

    match HostClipboard::new() {
        Some(clipboard) => imgui.set_clipboard_backend(clipboard),
        None => log::warn!("system clipboard unavailable, copy and paste disabled"),
    }

    let renderer = imgui_glow_renderer::AutoRenderer::initialize(gl, &mut imgui)
        .map_err(|err| HostError::RendererInit(format!("{err:?}")))?;

    Ok((imgui, platform, renderer))
}

pub struct HostClipboard {
    ctx: ClipboardContext,
}

impl HostClipboard {
    pub fn new() -> Option<Self> {
        match ClipboardContext::new() {
            Ok(ctx) => Some(Self { ctx }),
            Err(err) => {
                log::warn!("clipboard error: {err}");
                None
            }
        }
    }
}

impl ClipboardBackend for HostClipboard {
    fn get(&mut self) -> Option<String> {
        match self.ctx.get_text() {
            Ok(text) => Some(text),
            Err(err) => {
                log::warn!("clipboard error: {err}");
                None
            }
        }
    }

    fn set(&mut self, value: &str) {
        if let Err(err) = self.ctx.set_text(value.to_string()) {
            log::warn!("clipboard error: {err}");
        }
    }
}
