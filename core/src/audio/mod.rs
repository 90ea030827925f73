//! Audio mixing: four channels of 8-bit signed PCM with loop support,
//! stepped in 16.16 fixed point and summed into the backend's stereo
//! stream.
//!
//! The mixer runs inside the backend's audio callback, on the audio
//! thread. The engine issues play/stop commands through a shared
//! [`AudioHandle`]; channels hold their own reference-counted copy of
//! the sample bytes so a part change can drop the arena without racing
//! the callback (the engine stops all channels first regardless).

pub mod sfx;

use std::sync::{Arc, Mutex};

use byteorder::{BE, ByteOrder};
use log::{debug, warn};

use sfx::SfxPlayer;

/// Number of mixer channels.
pub const CHANNEL_COUNT: usize = 4;

/// Playback rates for the SOUND opcode's frequency operand: an
/// equal-tempered series over slightly more than three octaves, as the
/// original's Paula period table resolved to in Hz.
pub const FREQ_TABLE: [u16; 40] = [
    0x0CFF, 0x0DC3, 0x0E91, 0x0F6F, 0x1056, 0x114E, 0x1259, 0x136C,
    0x149F, 0x15D9, 0x1726, 0x1888, 0x19FD, 0x1B86, 0x1D21, 0x1EDE,
    0x20AB, 0x2280, 0x2495, 0x26B1, 0x28DA, 0x2B34, 0x2DAE, 0x3044,
    0x32F4, 0x35D1, 0x38E3, 0x3C29, 0x3FA9, 0x4366, 0x4768, 0x4BB8,
    0x5054, 0x5546, 0x5A94, 0x6049, 0x666F, 0x6CFF, 0x7404, 0x7B90,
];

/// Maximum channel volume; the SOUND opcode clamps one below it.
pub const MAX_VOLUME: u8 = 0x40;

/// An 8-bit signed PCM sample with an optional loop region directly
/// after the body.
#[derive(Clone)]
pub struct Sample {
    data: Arc<[u8]>,
    /// Body length in bytes.
    len: u32,
    /// Loop region length in bytes; 0 means play once.
    loop_len: u32,
}

impl Sample {
    /// Parse a sound resource: an 8-byte header of big-endian word
    /// counts (body, loop, reserved u32), then the PCM bytes.
    pub fn parse(resource: &[u8]) -> Option<Self> {
        if resource.len() < 8 {
            return None;
        }
        let data: Arc<[u8]> = resource[8..].into();
        let mut len = BE::read_u16(&resource[0..2]) as u32 * 2;
        let mut loop_len = BE::read_u16(&resource[2..4]) as u32 * 2;
        len = len.min(data.len() as u32);
        loop_len = loop_len.min(data.len() as u32 - len);
        Some(Self { data, len, loop_len })
    }

    /// Build a sample from raw PCM, for tests.
    pub fn from_pcm(pcm: &[u8], loop_len: u32) -> Self {
        Self {
            data: pcm.into(),
            len: pcm.len() as u32 - loop_len,
            loop_len,
        }
    }
}

struct Channel {
    sample: Option<Sample>,
    /// Playback cursor in 16.16 fixed point bytes.
    position: u32,
    /// Cursor advance per output frame, 16.16.
    step: u32,
    /// Fixed-point position at which the cursor wraps or the channel ends.
    end: u32,
    volume: u8,
}

impl Channel {
    const fn idle() -> Self {
        Self {
            sample: None,
            position: 0,
            step: 0,
            end: 0,
            volume: 0,
        }
    }
}

/// The four-channel software mixer.
pub struct Mixer {
    channels: [Channel; CHANNEL_COUNT],
    sample_rate: u32,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            channels: [const { Channel::idle() }; CHANNEL_COUNT],
            sample_rate,
        }
    }

    /// Start a sample on a channel at a playback rate in Hz. Volume is
    /// clamped to [`MAX_VOLUME`].
    pub fn play(&mut self, channel: u8, sample: Sample, freq_hz: u16, volume: u8) {
        let ch = &mut self.channels[channel as usize & 3];
        ch.step = (((freq_hz as u64) << 16) / self.sample_rate as u64) as u32;
        ch.position = 0;
        ch.end = sample.len << 16;
        ch.volume = volume.min(MAX_VOLUME);
        ch.sample = Some(sample);
        debug!(target: "audio", "play ch{} at {freq_hz} Hz vol {}", channel & 3, ch.volume);
    }

    pub fn stop(&mut self, channel: u8) {
        self.channels[channel as usize & 3].sample = None;
    }

    pub fn stop_all(&mut self) {
        for ch in &mut self.channels {
            ch.sample = None;
        }
    }

    pub fn set_volume(&mut self, channel: u8, volume: u8) {
        self.channels[channel as usize & 3].volume = volume.min(MAX_VOLUME);
    }

    pub fn is_active(&self, channel: u8) -> bool {
        self.channels[channel as usize & 3].sample.is_some()
    }

    /// Mix all channels into an interleaved stereo buffer, both lanes
    /// carrying the same sum. Channels whose sample runs out are retired.
    pub fn render(&mut self, out: &mut [i16]) {
        for frame in out.chunks_exact_mut(2) {
            let mut acc = 0i32;
            for ch in &mut self.channels {
                let Some(sample) = &ch.sample else {
                    continue;
                };
                if ch.position >= ch.end {
                    if sample.loop_len != 0 {
                        ch.position = sample.len << 16;
                        ch.end = (sample.len + sample.loop_len) << 16;
                    } else {
                        ch.sample = None;
                        continue;
                    }
                }
                let byte = sample.data[(ch.position >> 16) as usize];
                // Scale the 8-bit sample up to 16-bit range: ±127 at full
                // volume maps to ±32512.
                acc += byte as i8 as i32 * ch.volume as i32 * 4;
                ch.position = ch.position.wrapping_add(ch.step);
            }
            let clamped = acc.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            frame[0] = clamped;
            frame[1] = clamped;
        }
    }
}

/// Mixer plus music sequencer, shared between the engine thread and the
/// backend's audio callback.
pub struct Audio {
    pub mixer: Mixer,
    pub player: SfxPlayer,
    sample_rate: u32,
}

/// Cloneable handle the engine and the audio callback both hold.
pub type AudioHandle = Arc<Mutex<Audio>>;

impl Audio {
    pub fn new(sample_rate: u32) -> AudioHandle {
        Arc::new(Mutex::new(Self {
            mixer: Mixer::new(sample_rate),
            player: SfxPlayer::new(sample_rate),
            sample_rate,
        }))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Audio-callback entry point: interleave sequencer ticks with
    /// mixing so music events land on their 20 ms-scale grid.
    pub fn render(&mut self, out: &mut [i16]) {
        let mut done = 0;
        while done < out.len() {
            let frames_left = (out.len() - done) / 2;
            if frames_left == 0 {
                break;
            }
            let run = match self.player.frames_until_tick() {
                Some(until) if until as usize <= frames_left => {
                    if until == 0 {
                        self.player.handle_tick(&mut self.mixer);
                        continue;
                    }
                    until as usize
                }
                _ => frames_left,
            };
            let chunk = &mut out[done..done + run * 2];
            self.mixer.render(chunk);
            self.player.advance(run as u32);
            done += run * 2;
        }
    }
}

/// Resolve a SOUND opcode frequency operand, warning on out-of-range
/// indices the way the interpreter always has.
pub fn frequency_for_index(index: u8) -> u16 {
    match FREQ_TABLE.get(index as usize) {
        Some(&hz) => hz,
        None => {
            warn!(target: "audio", "frequency index {index} out of range");
            FREQ_TABLE[FREQ_TABLE.len() - 1]
        }
    }
}
