use imgui::{Image, MouseButton, TextureId, Ui};

use crate::view::{
    effective_texture_size, is_positive, layout, ImageFrame, PointerInput, ZoomPanState,
};

pub const DEFAULT_UV0: [f32; 2] = [0.0, 0.0];
pub const DEFAULT_UV1: [f32; 2] = [1.0, 1.0];
pub const DEFAULT_BG_COL: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
pub const DEFAULT_TINT_COL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// An image that can be zoomed with the mouse wheel, panned by dragging with
/// the left button and reset with a double click.
///
/// Without a [`ZoomPanState`] the image is drawn as a plain [`Image`].
#[derive(Clone, Debug)]
#[must_use = "call .build() to draw the image"]
pub struct ZoomableImage<'a> {
    texture_id: TextureId,
    image_size: [f32; 2],
    uv0: [f32; 2],
    uv1: [f32; 2],
    bg_col: [f32; 4],
    tint_col: [f32; 4],
    child_id: &'a str,
}

impl<'a> ZoomableImage<'a> {
    pub fn new(texture_id: TextureId, image_size: [f32; 2]) -> Self {
        Self {
            texture_id,
            image_size,
            uv0: DEFAULT_UV0,
            uv1: DEFAULT_UV1,
            bg_col: DEFAULT_BG_COL,
            tint_col: DEFAULT_TINT_COL,
            child_id: "ImageRegion",
        }
    }

    pub fn uv0(mut self, uv0: [f32; 2]) -> Self {
        self.uv0 = uv0;
        self
    }

    pub fn uv1(mut self, uv1: [f32; 2]) -> Self {
        self.uv1 = uv1;
        self
    }

    pub fn bg_col(mut self, bg_col: [f32; 4]) -> Self {
        self.bg_col = bg_col;
        self
    }

    pub fn tint_col(mut self, tint_col: [f32; 4]) -> Self {
        self.tint_col = tint_col;
        self
    }

    /// Id of the child region hosting the image. Needs to be unique when
    /// several zoomable images share a window.
    pub fn child_id(mut self, child_id: &'a str) -> Self {
        self.child_id = child_id;
        self
    }

    fn image(&self, size: [f32; 2], uv0: [f32; 2], uv1: [f32; 2]) -> Image {
        Image::new(self.texture_id, size)
            .uv0(uv0)
            .uv1(uv1)
            .tint_col(self.tint_col)
    }

    /// Draws the image and updates `state` from this frame's mouse input.
    /// Returns whether the image is hovered.
    pub fn build(self, ui: &Ui, state: Option<&mut ZoomPanState>) -> bool {
        if !is_positive(self.image_size) {
            return false;
        }

        let Some(state) = state else {
            let cursor = ui.cursor_screen_pos();
            self.draw_background(ui, cursor, self.image_size);
            self.image(self.image_size, self.uv0, self.uv1).build(ui);
            return ui.is_item_hovered();
        };

        // the child region keeps a drag on the image from moving the parent window
        ui.child_window(self.child_id)
            .size([0.0, 0.0])
            .border(false)
            .movable(false)
            .build(|| self.build_zoomable(ui, &mut *state))
            .unwrap_or_else(|| {
                // region clipped away this frame
                state.clear_pointer();
                false
            })
    }

    fn build_zoomable(&self, ui: &Ui, state: &mut ZoomPanState) -> bool {
        let texture_size =
            effective_texture_size(state.texture_size, self.image_size, self.uv0, self.uv1);

        let Some((display_size, origin)) = layout(
            ui.content_region_avail(),
            texture_size,
            state.maintain_aspect_ratio,
            ui.cursor_pos(),
        ) else {
            state.clear_pointer();
            return false;
        };

        ui.set_cursor_pos(origin);
        let screen_origin = ui.cursor_screen_pos();

        let (uv0, uv1) = state.transform().apply_to_uv(self.uv0, self.uv1);
        self.draw_background(ui, screen_origin, display_size);
        self.image(display_size, uv0, uv1).build(ui);

        if !ui.is_item_hovered() {
            state.clear_pointer();
            return false;
        }

        let frame = ImageFrame {
            display_size,
            texture_size,
            uv0: self.uv0,
            uv1: self.uv1,
        };
        state.track_pointer(&frame, &pointer_input(ui, screen_origin));
        true
    }

    fn draw_background(&self, ui: &Ui, origin: [f32; 2], size: [f32; 2]) {
        if self.bg_col[3] <= 0.0 {
            return;
        }
        ui.get_window_draw_list()
            .add_rect(origin, [origin[0] + size[0], origin[1] + size[1]], self.bg_col)
            .filled(true)
            .build();
    }
}

fn pointer_input(ui: &Ui, screen_origin: [f32; 2]) -> PointerInput {
    let io = ui.io();
    PointerInput {
        position: [
            io.mouse_pos[0] - screen_origin[0],
            io.mouse_pos[1] - screen_origin[1],
        ],
        wheel: io.mouse_wheel,
        double_clicked: ui.is_mouse_double_clicked(MouseButton::Left),
        primary_down: ui.is_mouse_down(MouseButton::Left),
        delta: io.mouse_delta,
    }
}

pub trait UiZoomableImage {
    /// Shorthand for [`ZoomableImage`] with default uvs and colors.
    fn zoomable_image(
        &self,
        texture_id: TextureId,
        image_size: [f32; 2],
        state: Option<&mut ZoomPanState>,
    ) -> bool;
}

impl UiZoomableImage for Ui {
    fn zoomable_image(
        &self,
        texture_id: TextureId,
        image_size: [f32; 2],
        state: Option<&mut ZoomPanState>,
    ) -> bool {
        ZoomableImage::new(texture_id, image_size).build(self, state)
    }
}
