use imgui::{Condition, TextureId};
use imgui_zoomable_image::{
    checkerboard::{checkerboard, DARK, LIGHT},
    GlowEngine, GlowGuiApp, GuiApp, HostError, ZoomPanState, ZoomableImage,
};

const TEXTURE_SIZE: [u32; 2] = [512, 256];

fn main() -> Result<(), HostError> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let mut gui_app = GlowGuiApp::new(String::from("imgui zoomable image regions"));
    gui_app.min_tick_time = 8;
    gui_app.run(ImageRegionsApp::default())
}

/// Two views into halves of one texture, each with its own zoom state, plus a
/// tinted view with a background color and no state at all.
#[derive(Default)]
struct ImageRegionsApp {
    texture_id: Option<TextureId>,
    left: ZoomPanState,
    right: ZoomPanState,
}

impl GuiApp for ImageRegionsApp {
    fn init(&mut self, engine: &mut GlowEngine) -> Result<(), HostError> {
        let [width, height] = TEXTURE_SIZE;
        let image = checkerboard(width, height, 16, LIGHT, DARK);
        self.texture_id = Some(engine.register_image(&image)?);

        self.left.maintain_aspect_ratio = true;
        self.right.maintain_aspect_ratio = true;
        Ok(())
    }

    fn ui(&mut self, ui: &mut imgui::Ui, _engine: &mut GlowEngine) {
        let Some(texture_id) = self.texture_id else {
            return;
        };
        let half = [TEXTURE_SIZE[0] as f32 * 0.5, TEXTURE_SIZE[1] as f32];

        for (title, state, uv0, uv1) in [
            ("Left Half", &mut self.left, [0.0, 0.0], [0.5, 1.0]),
            ("Right Half (flipped)", &mut self.right, [1.0, 1.0], [0.5, 0.0]),
        ] {
            ui.window(title)
                .size([320.0, 360.0], Condition::FirstUseEver)
                .build(|| {
                    // the image fills the rest of the window, so the readout goes first
                    match state.mouse_position {
                        Some([x, y]) => ui.text(format!(
                            "texel ({x:.0}, {y:.0}) at {:.0}%",
                            state.zoom_level * 100.0
                        )),
                        None => ui.text(format!("{:.0}%", state.zoom_level * 100.0)),
                    }
                    ZoomableImage::new(texture_id, half)
                        .uv0(uv0)
                        .uv1(uv1)
                        .bg_col([0.1, 0.1, 0.1, 1.0])
                        .child_id(title)
                        .build(ui, Some(&mut *state));
                });
        }

        ui.window("Tinted")
            .size([300.0, 200.0], Condition::FirstUseEver)
            .build(|| {
                ZoomableImage::new(texture_id, [256.0, 128.0])
                    .tint_col([1.0, 0.6, 0.6, 1.0])
                    .bg_col([0.0, 0.0, 0.3, 1.0])
                    .build(ui, None);
            });
    }
}
