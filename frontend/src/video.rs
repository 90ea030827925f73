use otherworld_core::video::{SCREEN_H, SCREEN_W};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};

/// Bytes per RGB24 scanline coming out of the engine.
const FRAME_PITCH: usize = SCREEN_W * 3;

/// Window and presenter for the engine's 320×200 framebuffer.
///
/// The window opens at an integer multiple of the native resolution and
/// stays resizable; the canvas keeps a 320×200 logical size, so the
/// renderer letterboxes arbitrary window shapes instead of stretching
/// the 16:10 picture.
pub struct Display {
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
}

impl Display {
    pub fn new(
        sdl_video: &sdl2::VideoSubsystem,
        title: &str,
        scale: u32,
    ) -> Result<Self, String> {
        let window = sdl_video
            .window(title, SCREEN_W as u32 * scale, SCREEN_H as u32 * scale)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| e.to_string())?;
        canvas
            .set_logical_size(SCREEN_W as u32, SCREEN_H as u32)
            .map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        Ok(Self {
            canvas,
            texture_creator,
        })
    }

    /// Upload one engine frame (`SCREEN_W × SCREEN_H × 3` bytes of
    /// RGB24) and present it.
    pub fn present(&mut self, frame: &[u8]) -> Result<(), String> {
        debug_assert_eq!(frame.len(), FRAME_PITCH * SCREEN_H);

        let mut texture = self
            .texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                SCREEN_W as u32,
                SCREEN_H as u32,
            )
            .map_err(|e| e.to_string())?;
        texture
            .update(None, frame, FRAME_PITCH)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}
