use std::time::{Duration, Instant};

use log::debug;
use otherworld_core::engine::Engine;
use sdl2::Sdl;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::input::{KeyMap, typed_char};
use crate::video::Display;

pub fn run(
    sdl_context: &Sdl,
    engine: &mut Engine,
    key_map: &KeyMap,
    scale: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let sdl_video = sdl_context.video()?;

    let (width, height) = engine.display_size();
    let mut display = Display::new(&sdl_video, "Otherworld", scale)?;
    let mut event_pump = sdl_context.event_pump()?;

    let buffer_size = (width * height * 3) as usize;
    let mut framebuffer = vec![0u8; buffer_size];
    let mut paused = false;

    'main: loop {
        let frame_start = Instant::now();

        // Poll all pending SDL events, translate to engine input
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::P),
                    repeat: false,
                    ..
                } => {
                    paused = !paused;
                    debug!(target: "backend", "pause {paused}");
                }

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(button_id) = key_map.get(sc) {
                        engine.set_input(button_id, true);
                    }
                    if let Some(ch) = typed_char(sc) {
                        engine.key_char(ch);
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(button_id) = key_map.get(sc) {
                        engine.set_input(button_id, false);
                    }
                }

                _ => {}
            }
        }

        if !paused {
            // Run one cooperative VM slice
            engine.run_frame()?;
        }

        // Render the displayed page and present
        engine.render_frame(&mut framebuffer);
        display.present(&framebuffer)?;

        // Pace to the bytecode's requested frame delay
        let target = Duration::from_millis(engine.frame_delay_ms() as u64);
        let elapsed = frame_start.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }

    Ok(())
}
