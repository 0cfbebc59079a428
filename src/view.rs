//! Zoom and pan arithmetic for [`crate::zoomable::ZoomableImage`].
//!
//! Three spaces are involved:
//! * screen: pixels relative to the top-left corner of the drawn image,
//!   normalized to `[0, 1]` by dividing by the display size.
//! * view: `[0, 1]` over the whole (unzoomed) image. The visible window is
//!   `offset .. offset + scale` in view space.
//! * texture: the caller's uv range `uv0 .. uv1`, and texels once multiplied
//!   by the texture size.

/// Scale factor applied to the visible window for one wheel step towards the
/// user (negative wheel, scrolling down).
pub const ZOOM_OUT_FACTOR: f32 = 1.1;
/// Scale factor applied to the visible window for one wheel step away from the
/// user (positive wheel, scrolling up).
pub const ZOOM_IN_FACTOR: f32 = 0.9;

/// Per-image view state, owned by the caller and kept between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomPanState {
    pub zoom_pan_enabled: bool,
    pub maintain_aspect_ratio: bool,
    /// Texture size in texels. Any non-positive component means it is
    /// inferred from the image size and uv range.
    pub texture_size: [f32; 2],
    pub zoom_level: f32,
    pub pan_offset: [f32; 2],
    /// Texel under the mouse, `None` while the image is not hovered.
    pub mouse_position: Option<[f32; 2]>,
}

impl Default for ZoomPanState {
    fn default() -> Self {
        Self {
            zoom_pan_enabled: true,
            maintain_aspect_ratio: false,
            texture_size: [0.0, 0.0],
            zoom_level: 1.0,
            pan_offset: [0.0, 0.0],
            mouse_position: None,
        }
    }
}

/// Geometry of the image as drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageFrame {
    pub display_size: [f32; 2],
    pub texture_size: [f32; 2],
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
}

/// Mouse snapshot for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Pixels relative to the top-left corner of the drawn image.
    pub position: [f32; 2],
    pub wheel: f32,
    pub double_clicked: bool,
    pub primary_down: bool,
    /// Pixels moved since the previous frame.
    pub delta: [f32; 2],
}

/// The affine map from screen space to view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: [f32; 2],
}

impl ViewTransform {
    pub fn from_state(state: &ZoomPanState) -> Self {
        Self {
            scale: 1.0 / state.zoom_level.max(1.0),
            offset: state.pan_offset,
        }
    }

    pub fn view_point(&self, screen_point: [f32; 2]) -> [f32; 2] {
        [
            self.offset[0] + screen_point[0] * self.scale,
            self.offset[1] + screen_point[1] * self.scale,
        ]
    }

    /// The part of `uv0 .. uv1` covered by the visible window.
    pub fn apply_to_uv(&self, uv0: [f32; 2], uv1: [f32; 2]) -> ([f32; 2], [f32; 2]) {
        let start = self.view_point([0.0, 0.0]);
        let end = self.view_point([1.0, 1.0]);
        (lerp(uv0, uv1, start), lerp(uv0, uv1, end))
    }
}

fn lerp(a: [f32; 2], b: [f32; 2], t: [f32; 2]) -> [f32; 2] {
    [a[0] + t[0] * (b[0] - a[0]), a[1] + t[1] * (b[1] - a[1])]
}

/// Returns `texture_size` when it is fully specified, otherwise infers it from
/// the image size and the uv span it covers.
pub fn effective_texture_size(
    texture_size: [f32; 2],
    image_size: [f32; 2],
    uv0: [f32; 2],
    uv1: [f32; 2],
) -> [f32; 2] {
    if is_positive(texture_size) {
        return texture_size;
    }

    let infer = |axis: usize| {
        let span = (uv1[axis] - uv0[axis]).abs();
        if span > 0.0 {
            image_size[axis] / span
        } else {
            image_size[axis]
        }
    };
    [infer(0), infer(1)]
}

/// Shrinks one axis of `widget_size` so the result has the texture's aspect ratio.
pub fn fit_to_aspect(widget_size: [f32; 2], texture_size: [f32; 2], maintain: bool) -> [f32; 2] {
    if !maintain {
        return widget_size;
    }

    let aspect_ratio = texture_size[0] / texture_size[1];
    let [mut width, mut height] = widget_size;
    if width / height > aspect_ratio {
        width = height * aspect_ratio;
    } else {
        height = width / aspect_ratio;
    }
    [width, height]
}

/// Display size and top-left position of the image inside a widget region, or
/// `None` when the region is empty.
pub fn layout(
    widget_size: [f32; 2],
    texture_size: [f32; 2],
    maintain_aspect_ratio: bool,
    cursor: [f32; 2],
) -> Option<([f32; 2], [f32; 2])> {
    if !is_positive(widget_size) {
        return None;
    }
    let display_size = fit_to_aspect(widget_size, texture_size, maintain_aspect_ratio);
    Some((display_size, centered_origin(widget_size, display_size, cursor)))
}

/// Both components strictly positive. NaN is rejected.
pub fn is_positive(size: [f32; 2]) -> bool {
    size[0] > 0.0 && size[1] > 0.0
}

pub fn centered_origin(widget_size: [f32; 2], display_size: [f32; 2], cursor: [f32; 2]) -> [f32; 2] {
    [
        (widget_size[0] - display_size[0]) * 0.5 + cursor[0],
        (widget_size[1] - display_size[1]) * 0.5 + cursor[1],
    ]
}

fn clamp_offset(offset: [f32; 2], scale: f32) -> [f32; 2] {
    let max = 1.0 - scale;
    [offset[0].min(max).max(0.0), offset[1].min(max).max(0.0)]
}

impl ZoomPanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texture_size(mut self, texture_size: [f32; 2]) -> Self {
        self.texture_size = texture_size;
        self
    }

    pub fn with_aspect_ratio(mut self, maintain: bool) -> Self {
        self.maintain_aspect_ratio = maintain;
        self
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform::from_state(self)
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom_level > 1.0
    }

    pub fn reset_view(&mut self) {
        self.zoom_level = 1.0;
        self.pan_offset = [0.0, 0.0];
    }

    /// Multiplies the visible window by `factor`, keeping `screen_point` fixed.
    ///
    /// The window never exceeds the whole image, and never shrinks below one
    /// texel of the larger texture axis.
    pub fn zoom_about(&mut self, screen_point: [f32; 2], factor: f32, texture_size: [f32; 2]) {
        let transform = self.transform();
        let view_point = transform.view_point(screen_point);

        let min_scale = 1.0 / texture_size[0].max(texture_size[1]);
        let scale = (factor * transform.scale).max(min_scale).min(1.0);

        // view_point = t + screen_point * scale, solved for t
        let offset = [
            view_point[0] - screen_point[0] * scale,
            view_point[1] - screen_point[1] * scale,
        ];

        self.zoom_level = 1.0 / scale;
        self.pan_offset = clamp_offset(offset, scale);
    }

    /// Moves the image by `screen_delta` (normalized by the display size).
    pub fn pan_by(&mut self, screen_delta: [f32; 2]) {
        let transform = self.transform();
        let offset = [
            transform.offset[0] - screen_delta[0] * transform.scale,
            transform.offset[1] - screen_delta[1] * transform.scale,
        ];
        self.pan_offset = clamp_offset(offset, transform.scale);
    }

    /// Updates the hovered texel and reacts to wheel, double click and drag.
    pub fn track_pointer(&mut self, frame: &ImageFrame, input: &PointerInput) {
        let screen_point = [
            input.position[0] / frame.display_size[0],
            input.position[1] / frame.display_size[1],
        ];
        let view_point = self.transform().view_point(screen_point);

        let uv = lerp(frame.uv0, frame.uv1, view_point);
        // max/min rather than clamp: a NaN or negative texture size must not panic
        let texel = |axis: usize| {
            (uv[axis] * frame.texture_size[axis])
                .max(0.0)
                .min(frame.texture_size[axis])
        };
        self.mouse_position = Some([texel(0), texel(1)]);

        if !self.zoom_pan_enabled {
            return;
        }

        if input.wheel != 0.0 {
            let factor = if input.wheel < 0.0 {
                ZOOM_OUT_FACTOR
            } else {
                ZOOM_IN_FACTOR
            };
            self.zoom_about(screen_point, factor, frame.texture_size);
        } else if input.double_clicked {
            self.reset_view();
        } else if input.primary_down {
            self.pan_by([
                input.delta[0] / frame.display_size[0],
                input.delta[1] / frame.display_size[1],
            ]);
        }
    }

    pub fn clear_pointer(&mut self) {
        self.mouse_position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn assert_close(a: [f32; 2], b: [f32; 2]) {
        assert!(
            (a[0] - b[0]).abs() < EPS && (a[1] - b[1]).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    fn frame(display: f32, texture: f32) -> ImageFrame {
        ImageFrame {
            display_size: [display, display],
            texture_size: [texture, texture],
            uv0: [0.0, 0.0],
            uv1: [1.0, 1.0],
        }
    }

    fn wheel_at(position: [f32; 2], wheel: f32) -> PointerInput {
        PointerInput {
            position,
            wheel,
            ..Default::default()
        }
    }

    #[test]
    fn default_state_is_unzoomed() {
        let state = ZoomPanState::default();
        assert!(state.zoom_pan_enabled);
        assert!(!state.maintain_aspect_ratio);
        assert!(!state.is_zoomed());
        assert_eq!(state.mouse_position, None);
        assert_eq!(
            state.transform(),
            ViewTransform {
                scale: 1.0,
                offset: [0.0, 0.0]
            }
        );
    }

    #[test]
    fn zoom_below_one_is_treated_as_one() {
        let state = ZoomPanState {
            zoom_level: 0.25,
            ..Default::default()
        };
        assert_eq!(state.transform().scale, 1.0);
    }

    #[test]
    fn explicit_texture_size_wins() {
        let size = effective_texture_size([640.0, 480.0], [100.0, 100.0], [0.0, 0.0], [1.0, 1.0]);
        assert_eq!(size, [640.0, 480.0]);
    }

    #[test]
    fn texture_size_is_inferred_from_uv_span() {
        let size = effective_texture_size([0.0, 480.0], [200.0, 100.0], [0.25, 1.0], [0.75, 0.5]);
        assert_close(size, [400.0, 200.0]);
    }

    #[test]
    fn zero_uv_span_falls_back_to_image_size() {
        let size = effective_texture_size([0.0, 0.0], [200.0, 100.0], [0.5, 0.0], [0.5, 1.0]);
        assert_close(size, [200.0, 100.0]);
    }

    #[test]
    fn aspect_fit_shrinks_the_wider_axis() {
        assert_close(fit_to_aspect([400.0, 100.0], [200.0, 100.0], true), [200.0, 100.0]);
        assert_close(fit_to_aspect([100.0, 400.0], [200.0, 100.0], true), [100.0, 50.0]);
        assert_close(fit_to_aspect([400.0, 100.0], [200.0, 100.0], false), [400.0, 100.0]);
    }

    #[test]
    fn empty_region_has_no_layout() {
        assert_eq!(layout([0.0, 100.0], [64.0, 64.0], false, [0.0, 0.0]), None);
        assert_eq!(layout([100.0, -1.0], [64.0, 64.0], true, [0.0, 0.0]), None);
        assert_eq!(layout([f32::NAN, 100.0], [64.0, 64.0], false, [0.0, 0.0]), None);
    }

    #[test]
    fn layout_fits_and_centers() {
        let (display, origin) =
            layout([400.0, 100.0], [200.0, 100.0], true, [8.0, 30.0]).expect("non-empty region");
        assert_close(display, [200.0, 100.0]);
        assert_close(origin, [108.0, 30.0]);
    }

    #[test]
    fn positive_sizes_reject_nan() {
        assert!(is_positive([1.0, 2.0]));
        assert!(!is_positive([f32::NAN, 2.0]));
        assert!(!is_positive([1.0, 0.0]));
    }

    #[test]
    fn display_is_centered_in_widget() {
        let origin = centered_origin([400.0, 100.0], [200.0, 100.0], [8.0, 30.0]);
        assert_close(origin, [108.0, 30.0]);
    }

    #[test]
    fn uv_range_follows_the_visible_window() {
        let state = ZoomPanState {
            zoom_level: 4.0,
            pan_offset: [0.5, 0.25],
            ..Default::default()
        };
        let (uv0, uv1) = state.transform().apply_to_uv([0.0, 0.0], [1.0, 1.0]);
        assert_close(uv0, [0.5, 0.25]);
        assert_close(uv1, [0.75, 0.5]);
    }

    #[test]
    fn uv_sub_range_is_zoomed_within_itself() {
        let transform = ViewTransform {
            scale: 0.5,
            offset: [0.5, 0.0],
        };
        let (uv0, uv1) = transform.apply_to_uv([0.5, 1.0], [1.0, 0.0]);
        assert_close(uv0, [0.75, 1.0]);
        assert_close(uv1, [1.0, 0.5]);
    }

    #[test]
    fn zooming_keeps_the_cursor_point_fixed() {
        let mut state = ZoomPanState::default();
        let frame = frame(100.0, 1000.0);
        let cursor = [30.0, 60.0];
        let screen_point = [0.3, 0.6];

        state.track_pointer(&frame, &wheel_at(cursor, 1.0));
        state.track_pointer(&frame, &wheel_at(cursor, 1.0));
        let before = state.transform().view_point(screen_point);
        assert!(state.is_zoomed());

        state.track_pointer(&frame, &wheel_at(cursor, 1.0));
        let after = state.transform().view_point(screen_point);
        assert_close(before, after);
        assert!((state.zoom_level - 1.0 / (0.9 * 0.9 * 0.9)).abs() < EPS);
    }

    #[test]
    fn zoom_out_stops_at_whole_image() {
        let mut state = ZoomPanState::default();
        let frame = frame(100.0, 1000.0);
        state.track_pointer(&frame, &wheel_at([50.0, 50.0], -1.0));
        assert_eq!(state.zoom_level, 1.0);
        assert_close(state.pan_offset, [0.0, 0.0]);
    }

    #[test]
    fn zoom_in_stops_at_one_texel() {
        let mut state = ZoomPanState::default();
        let frame = frame(100.0, 8.0);
        for _ in 0..100 {
            state.track_pointer(&frame, &wheel_at([50.0, 50.0], 1.0));
        }
        assert!((state.zoom_level - 8.0).abs() < EPS);
        let offset = state.pan_offset;
        assert!(offset.iter().all(|t| (0.0..=1.0 - 1.0 / 8.0 + EPS).contains(t)));
    }

    #[test]
    fn sub_texel_texture_cannot_zoom() {
        let mut state = ZoomPanState::default();
        state.zoom_about([0.5, 0.5], ZOOM_IN_FACTOR, [0.5, 0.5]);
        assert_eq!(state.transform().scale, 1.0);
        assert_close(state.pan_offset, [0.0, 0.0]);
    }

    #[test]
    fn invalid_texture_size_does_not_panic() {
        let mut state = ZoomPanState::default();
        let input = PointerInput {
            position: [50.0, 50.0],
            ..Default::default()
        };
        for texture_size in [[f32::NAN, 64.0], [-8.0, 64.0]] {
            let frame = ImageFrame {
                texture_size,
                ..frame(100.0, 64.0)
            };
            state.track_pointer(&frame, &input);
            let position = state.mouse_position.expect("hovered");
            assert_eq!(position[1], 32.0);
        }
    }

    #[test]
    fn zoom_at_corner_keeps_offset_in_bounds() {
        let mut state = ZoomPanState {
            zoom_level: 2.0,
            pan_offset: [0.5, 0.5],
            ..Default::default()
        };
        state.zoom_about([1.0, 1.0], ZOOM_OUT_FACTOR, [100.0, 100.0]);
        let max = 1.0 - 1.0 / state.zoom_level;
        assert!(state.pan_offset[0] <= max + EPS);
        assert!(state.pan_offset[1] <= max + EPS);
    }

    #[test]
    fn dragging_pans_against_mouse_motion() {
        let mut state = ZoomPanState {
            zoom_level: 2.0,
            pan_offset: [0.25, 0.25],
            ..Default::default()
        };
        let input = PointerInput {
            position: [50.0, 50.0],
            primary_down: true,
            delta: [10.0, -20.0],
            ..Default::default()
        };
        state.track_pointer(&frame(100.0, 100.0), &input);
        assert_close(state.pan_offset, [0.2, 0.35]);
    }

    #[test]
    fn panning_is_clamped_to_the_image() {
        let mut state = ZoomPanState {
            zoom_level: 2.0,
            pan_offset: [0.25, 0.25],
            ..Default::default()
        };
        state.pan_by([-10.0, 10.0]);
        assert_close(state.pan_offset, [0.5, 0.0]);
    }

    #[test]
    fn panning_unzoomed_image_does_nothing() {
        let mut state = ZoomPanState::default();
        state.pan_by([0.3, -0.3]);
        assert_close(state.pan_offset, [0.0, 0.0]);
    }

    #[test]
    fn double_click_resets_the_view() {
        let mut state = ZoomPanState {
            zoom_level: 3.0,
            pan_offset: [0.1, 0.2],
            ..Default::default()
        };
        let input = PointerInput {
            position: [10.0, 10.0],
            double_clicked: true,
            primary_down: true,
            delta: [5.0, 5.0],
            ..Default::default()
        };
        state.track_pointer(&frame(100.0, 100.0), &input);
        assert!(!state.is_zoomed());
        assert_close(state.pan_offset, [0.0, 0.0]);
    }

    #[test]
    fn wheel_takes_priority_over_drag() {
        let mut state = ZoomPanState::default();
        let input = PointerInput {
            position: [50.0, 50.0],
            wheel: 1.0,
            primary_down: true,
            delta: [40.0, 40.0],
            ..Default::default()
        };
        state.track_pointer(&frame(100.0, 100.0), &input);
        assert!(state.is_zoomed());
        // a drag would have clamped the offset to zero
        assert!(state.pan_offset[0] > 0.0);
    }

    #[test]
    fn disabled_state_only_tracks_the_mouse() {
        let mut state = ZoomPanState {
            zoom_pan_enabled: false,
            ..Default::default()
        };
        state.track_pointer(&frame(100.0, 640.0), &wheel_at([25.0, 75.0], 1.0));
        assert!(!state.is_zoomed());
        let position = state.mouse_position.expect("hovered");
        assert_close(position, [160.0, 480.0]);
    }

    #[test]
    fn mouse_position_respects_zoom_and_uv_range() {
        let mut state = ZoomPanState {
            zoom_level: 2.0,
            pan_offset: [0.5, 0.0],
            ..Default::default()
        };
        let frame = ImageFrame {
            display_size: [100.0, 100.0],
            texture_size: [200.0, 200.0],
            uv0: [0.0, 1.0],
            uv1: [1.0, 0.0],
        };
        state.track_pointer(
            &frame,
            &PointerInput {
                position: [50.0, 50.0],
                ..Default::default()
            },
        );
        // view point (0.75, 0.25), y axis flipped by the uv range
        assert_close(state.mouse_position.expect("hovered"), [150.0, 150.0]);
    }

    #[test]
    fn mouse_position_is_clamped_to_texture() {
        let mut state = ZoomPanState::default();
        let input = PointerInput {
            position: [150.0, -20.0],
            ..Default::default()
        };
        state.track_pointer(&frame(100.0, 64.0), &input);
        assert_close(state.mouse_position.expect("hovered"), [64.0, 0.0]);

        state.clear_pointer();
        assert_eq!(state.mouse_position, None);
    }
}
