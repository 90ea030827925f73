use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use otherworld_core::audio::{Audio, AudioHandle};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

/// Output sample rate. The mixer is told the same figure, so the
/// desired spec must not be left to SDL's discretion.
const SAMPLE_RATE: u32 = 44_100;

/// Number of stereo frames over which to fade in/out (~5.8 ms).
const FADE_FRAMES: u32 = 256;

/// SDL audio callback: pulls the core mixer and music sequencer, then
/// applies the startup/shutdown fades.
pub(crate) struct AudioPlayer {
    audio: AudioHandle,
    fade_in_pos: u32,
    fading_out: Arc<AtomicBool>,
    fade_out_pos: u32,
}

impl AudioCallback for AudioPlayer {
    type Channel = i16;
    fn callback(&mut self, out: &mut [i16]) {
        self.audio.lock().unwrap().render(out);

        for frame in out.chunks_exact_mut(2) {
            if self.fade_in_pos < FADE_FRAMES {
                // Ramp up from silence at startup
                let gain = self.fade_in_pos as f32 / FADE_FRAMES as f32;
                frame[0] = (frame[0] as f32 * gain) as i16;
                frame[1] = (frame[1] as f32 * gain) as i16;
                self.fade_in_pos += 1;
            } else if self.fading_out.load(Ordering::Relaxed) {
                // Ramp down to silence at shutdown
                if self.fade_out_pos < FADE_FRAMES {
                    let gain = 1.0 - (self.fade_out_pos as f32 / FADE_FRAMES as f32);
                    frame[0] = (frame[0] as f32 * gain) as i16;
                    frame[1] = (frame[1] as f32 * gain) as i16;
                    self.fade_out_pos += 1;
                } else {
                    frame[0] = 0;
                    frame[1] = 0;
                }
            }
        }
    }
}

/// Handle for signalling the audio callback to fade out before shutdown.
pub type FadeOut = Arc<AtomicBool>;

/// Initialize SDL2 audio playback.
///
/// Returns the audio device (must be kept alive), the shared audio
/// state for the engine, and a fade-out signal for clean shutdown.
pub fn init(
    sdl_audio: &sdl2::AudioSubsystem,
) -> Result<(AudioDevice<AudioPlayer>, AudioHandle, FadeOut), String> {
    let audio = Audio::new(SAMPLE_RATE);
    let fade_out: FadeOut = Arc::new(AtomicBool::new(false));

    let desired_spec = AudioSpecDesired {
        freq: Some(SAMPLE_RATE as i32),
        channels: Some(2),
        samples: Some(512), // ~11.6 ms at 44100 Hz
    };

    let device = sdl_audio.open_playback(None, &desired_spec, |_spec| AudioPlayer {
        audio: Arc::clone(&audio),
        fade_in_pos: 0,
        fading_out: Arc::clone(&fade_out),
        fade_out_pos: 0,
    })?;

    // Device starts paused; main resumes it once the engine is up.
    Ok((device, audio, fade_out))
}

/// Duration to sleep after signalling fade-out, allowing the callback
/// to ramp down before the device is paused.
pub fn fade_out_duration() -> std::time::Duration {
    // FADE_FRAMES at 44100 Hz ≈ 5.8 ms; round up to 10 ms for safety.
    std::time::Duration::from_millis(10)
}
