use std::{
    num::NonZeroU32,
    rc::Rc,
    time::{Duration, Instant},
};

use glow::HasContext;
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextAttributesBuilder, PossiblyCurrentContext},
    display::{Display, DisplayApiPreference, GetGlDisplay},
    prelude::*,
    surface::{Surface, SurfaceAttributesBuilder, WindowSurface},
};
use imgui_glow_renderer::TextureMap;
use raw_window_handle::{HasRawDisplayHandle, HasRawWindowHandle, RawWindowHandle};
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

pub use imgui;
pub use winit;

pub mod checkerboard;
pub mod error;
pub mod gl_imgui;
pub mod view;
pub mod zoomable;

pub use error::HostError;
pub use view::{ImageFrame, PointerInput, ViewTransform, ZoomPanState};
pub use zoomable::{UiZoomableImage, ZoomableImage};

pub trait GuiApp {
    /// Called once after the window and OpenGL context exist, to create
    /// textures and other GPU resources.
    fn init(&mut self, _engine: &mut GlowEngine) -> Result<(), HostError> {
        Ok(())
    }
    /// Called before every potential frame. Returning `true` asks for a redraw
    /// even when no input arrived.
    fn update(&mut self, _engine: &mut GlowEngine, _delta_time: Duration) -> bool {
        false
    }
    /// Builds this frame's widgets.
    fn ui(&mut self, ui: &mut imgui::Ui, engine: &mut GlowEngine);
}

/// Window and frame pacing settings. `run` opens the window and blocks until it closes.
pub struct GlowGuiApp {
    application_title: String,
    pub width: u32,
    pub height: u32,
    pub min_tick_time: u64,
    pub max_tick_time: u64,
    pub font_size: f64,
    pub clear_color: [f32; 4],
}

impl GlowGuiApp {
    pub fn new(application_title: String) -> Self {
        Self {
            application_title,
            width: 1280,
            height: 800,
            min_tick_time: 16,
            max_tick_time: 120,
            font_size: 13.0,
            clear_color: [0.45, 0.55, 0.60, 1.00],
        }
    }

    pub fn run<T: GuiApp>(&mut self, mut app: T) -> Result<(), HostError> {
        let event_loop = EventLoop::new()?;
        let (window, surface, context) =
            create_window(&event_loop, self.width, self.height, &self.application_title)?;

        let gl = glow_context(&context);
        let (imgui, platform, renderer) = gl_imgui::init_imgui(&window, gl, self.font_size)?;

        let mut engine = GlowEngine {
            window,
            surface,
            context,
            renderer,
            clear_color: self.clear_color,
            min_tick_time: self.min_tick_time,
            max_tick_time: self.max_tick_time,
            is_focused: false,
            resize_requested: None,
        };
        app.init(&mut engine)?;

        log::info!("starting {}", self.application_title);
        engine.main_loop(event_loop, imgui, platform, app)
    }
}

/// The running window, OpenGL context and imgui renderer, handed to [`GuiApp`] callbacks.
pub struct GlowEngine {
    pub is_focused: bool,
    pub max_tick_time: u64,
    pub min_tick_time: u64,
    pub clear_color: [f32; 4],
    resize_requested: Option<PhysicalSize<u32>>,
    renderer: imgui_glow_renderer::AutoRenderer,
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    window: Window,
}

impl GlowEngine {
    pub fn gl(&self) -> &Rc<glow::Context> {
        self.renderer.gl_context()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn register_texture(&mut self, texture: glow::Texture) -> Result<imgui::TextureId, HostError> {
        let id = self
            .renderer
            .texture_map_mut()
            .register(texture)
            .ok_or(HostError::TextureRegistration)?;
        log::debug!("registered texture {:?}", id);
        Ok(id)
    }

    /// Uploads `image` and makes it available to imgui.
    pub fn register_image(&mut self, image: &image::RgbaImage) -> Result<imgui::TextureId, HostError> {
        let texture = checkerboard::upload_texture(self.gl(), image)?;
        self.register_texture(texture)
    }

    fn resize_surface(&mut self, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.surface.resize(&self.context, width, height);
        }
    }

    fn main_loop<T: GuiApp>(
        mut self,
        event_loop: EventLoop<()>,
        mut imgui: imgui::Context,
        mut platform: imgui_winit_support::WinitPlatform,
        mut app: T,
    ) -> Result<(), HostError> {
        let mut last_frame = Instant::now();
        let mut delta_time = Duration::ZERO;
        let min_tick_time = Duration::from_millis(self.min_tick_time);
        let max_tick_time = Duration::from_millis(self.max_tick_time);
        let mut total_time_since_last_tick = delta_time;

        let mut input_counter = 0;

        event_loop.run(move |event, elwt| {
            platform.handle_event(imgui.io_mut(), &self.window, &event);

            match event {
                Event::NewEvents(_) => {
                    let now = Instant::now();
                    delta_time = now - last_frame;

                    total_time_since_last_tick += delta_time;
                    imgui.io_mut().update_delta_time(delta_time);
                    last_frame = now;
                }
                Event::AboutToWait => {
                    self.window.request_redraw();
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(new_size) => {
                        self.resize_requested = Some(new_size);
                    }
                    WindowEvent::Focused(is_focused) => {
                        self.is_focused = is_focused;
                    }
                    WindowEvent::MouseInput { .. }
                    | WindowEvent::CursorMoved { .. }
                    | WindowEvent::CursorLeft { .. }
                    | WindowEvent::MouseWheel { .. } => {
                        input_counter += 1;
                    }
                    WindowEvent::KeyboardInput { .. } => {
                        if self.is_focused {
                            input_counter += 1;
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(size) = self.resize_requested.take() {
                            self.resize_surface(size);
                            input_counter += 1;
                        }

                        let is_updated = app.update(&mut self, delta_time);

                        if (total_time_since_last_tick >= min_tick_time
                            && (is_updated || input_counter > 0))
                            || total_time_since_last_tick >= max_tick_time
                        {
                            if let Err(err) = self.draw(&mut imgui, &mut platform, &mut app) {
                                log::error!("{err}");
                                elwt.exit();
                            }
                            total_time_since_last_tick = Duration::ZERO;
                            input_counter = 0;
                        }
                    }
                    _ => (),
                },
                _ => (),
            }
        })?;

        Ok(())
    }

    fn draw<T: GuiApp>(
        &mut self,
        imgui: &mut imgui::Context,
        platform: &mut imgui_winit_support::WinitPlatform,
        app: &mut T,
    ) -> Result<(), HostError> {
        platform.prepare_frame(imgui.io_mut(), &self.window)?;
        let ui = imgui.frame();

        app.ui(ui, self);

        platform.prepare_render(ui, &self.window);
        let draw_data = imgui.render();

        // skip drawing while minimized
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }

        let [r, g, b, a] = self.clear_color;
        unsafe {
            let gl = self.renderer.gl_context();
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
        self.renderer
            .render(draw_data)
            .map_err(|err| HostError::Render(format!("{err:?}")))?;
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}

fn create_window(
    event_loop: &EventLoop<()>,
    width: u32,
    height: u32,
    title: &str,
) -> Result<(Window, Surface<WindowSurface>, PossiblyCurrentContext), HostError> {
    let window = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(winit::dpi::LogicalSize::new(width, height))
        .build(event_loop)
        .map_err(|err| HostError::Window(err.to_string()))?;

    let raw_window_handle = window.raw_window_handle();
    let display = unsafe {
        Display::new(
            window.raw_display_handle(),
            display_preference(raw_window_handle),
        )?
    };

    let template = ConfigTemplateBuilder::new()
        .compatible_with_native_window(raw_window_handle)
        .build();
    let config = pick_config(unsafe { display.find_configs(template)? })
        .ok_or(HostError::NoGlConfig)?;

    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let context = unsafe { display.create_context(&config, &context_attributes)? };

    let size = window.inner_size();
    let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new()
        .with_srgb(Some(true))
        .build(
            raw_window_handle,
            NonZeroU32::new(size.width).ok_or(HostError::ZeroSizedWindow)?,
            NonZeroU32::new(size.height).ok_or(HostError::ZeroSizedWindow)?,
        );
    let surface = unsafe { display.create_window_surface(&config, &surface_attributes)? };

    let context = context.make_current(&surface)?;

    Ok((window, surface, context))
}

// Windows needs the window handle to create a WGL display.
#[cfg(target_os = "windows")]
fn display_preference(raw_window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::WglThenEgl(Some(raw_window_handle))
}

#[cfg(target_os = "macos")]
fn display_preference(_raw_window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn display_preference(_raw_window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::EglThenGlx(Box::new(winit::platform::x11::register_xlib_error_hook))
}

/// The config with the most multisampling, if the display offers any.
fn pick_config(configs: impl Iterator<Item = Config>) -> Option<Config> {
    configs.max_by_key(|config| config.num_samples())
}

fn glow_context(context: &PossiblyCurrentContext) -> glow::Context {
    unsafe {
        glow::Context::from_loader_function_cstr(|name| {
            context.display().get_proc_address(name).cast()
        })
    }
}
