use clap::Parser;
use imgui::{Condition, TextureId};
use imgui_zoomable_image::{
    checkerboard::{checkerboard, DARK, LIGHT},
    GlowEngine, GlowGuiApp, GuiApp, HostError, UiZoomableImage, ZoomPanState,
};

/// Shows a checkerboard texture that can be zoomed with the wheel, panned by
/// dragging and reset with a double click.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = 320)]
    width: u32,
    #[arg(long, default_value_t = 240)]
    height: u32,
    /// Edge length of one checker cell in texels.
    #[arg(long, default_value_t = 20)]
    cell: u32,
    #[arg(long)]
    maintain_aspect_ratio: bool,
    /// Let the widget infer the texture size from the display size.
    #[arg(long)]
    infer_texture_size: bool,
}

fn main() -> Result<(), HostError> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let args = Args::parse();
    let mut gui_app = GlowGuiApp::new(String::from("imgui zoomable image example"));
    gui_app.run(ZoomableImageApp::new(args))
}

struct ZoomableImageApp {
    args: Args,
    texture_id: Option<TextureId>,
    zoom_state: ZoomPanState,
    display_size: [f32; 2],
}

impl ZoomableImageApp {
    fn new(args: Args) -> Self {
        let mut zoom_state = ZoomPanState::new().with_aspect_ratio(args.maintain_aspect_ratio);
        if !args.infer_texture_size {
            zoom_state = zoom_state.with_texture_size([args.width as f32, args.height as f32]);
        }
        Self {
            args,
            texture_id: None,
            zoom_state,
            display_size: [0.0, 0.0],
        }
    }
}

impl GuiApp for ZoomableImageApp {
    fn init(&mut self, engine: &mut GlowEngine) -> Result<(), HostError> {
        let image = checkerboard(self.args.width, self.args.height, self.args.cell, LIGHT, DARK);
        self.texture_id = Some(engine.register_image(&image)?);
        Ok(())
    }

    fn ui(&mut self, ui: &mut imgui::Ui, _engine: &mut GlowEngine) {
        let Some(texture_id) = self.texture_id else {
            return;
        };
        let [frame_width, frame_height] = ui.io().display_size;

        ui.window("Image Window")
            .position([frame_width * 0.1, frame_height * 0.1], Condition::Once)
            .size([frame_width * 0.5, frame_height * 0.5], Condition::Once)
            .build(|| {
                self.display_size = ui.content_region_avail();
                ui.zoomable_image(texture_id, self.display_size, Some(&mut self.zoom_state));
            });

        let state = &mut self.zoom_state;
        ui.window("Controls Window")
            .position([frame_width * 0.7, frame_height * 0.1], Condition::Once)
            .build(|| {
                ui.checkbox("Enable Zoom/Pan", &mut state.zoom_pan_enabled);
                ui.checkbox("Maintain Aspect Ratio", &mut state.maintain_aspect_ratio);
                if ui.button("Reset Zoom/Pan") {
                    state.reset_view();
                }
                ui.separator();
                ui.text(format!(
                    "Texture Size: {} x {}",
                    self.args.width, self.args.height
                ));
                ui.text(format!(
                    "Display Size: {:.0} x {:.0}",
                    self.display_size[0], self.display_size[1]
                ));
                ui.text(format!("Zoom Level: {:.2}%", state.zoom_level * 100.0));
                ui.text(format!(
                    "Pan Offset: ({:.2}, {:.2})",
                    state.pan_offset[0] * self.args.width as f32,
                    state.pan_offset[1] * self.args.height as f32
                ));
                match state.mouse_position {
                    Some([x, y]) => ui.text(format!("Mouse Pos: ({x:.2}, {y:.2})")),
                    None => ui.text("Mouse Pos: -"),
                }
                ui.separator();
                let framerate = ui.io().framerate;
                ui.text(format!(
                    "Application average {:.3} ms/frame ({:.1} FPS)",
                    1000.0 / framerate,
                    framerate
                ));
            });
    }
}
