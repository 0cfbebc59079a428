use glow::HasContext;
use image::{Rgba, RgbaImage};

use crate::HostError;

pub const LIGHT: Rgba<u8> = Rgba([200, 200, 200, 255]);
pub const DARK: Rgba<u8> = Rgba([50, 50, 50, 255]);

/// Alternating `cell` x `cell` squares, starting with `even` in the top-left corner.
pub fn checkerboard(width: u32, height: u32, cell: u32, even: Rgba<u8>, odd: Rgba<u8>) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            even
        } else {
            odd
        }
    })
}

/// Uploads an RGBA8 image as a 2D texture with nearest filtering.
pub fn upload_texture(gl: &glow::Context, image: &RgbaImage) -> Result<glow::Texture, HostError> {
    let width = i32::try_from(image.width()).map_err(|_| HostError::TextureTooLarge)?;
    let height = i32::try_from(image.height()).map_err(|_| HostError::TextureTooLarge)?;

    let texture = unsafe { gl.create_texture() }.map_err(HostError::TextureCreation)?;
    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA as i32,
            width,
            height,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            Some(image.as_raw()),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    log::debug!("uploaded {}x{} texture", image.width(), image.height());
    Ok(texture)
}
