//! Music sequencer.
//!
//! A music resource is a module: a header naming up to fifteen
//! instrument sound resources, an order table, and 1024-byte patterns
//! of four-channel rows. The sequencer consumes one row per tick, with
//! the tick period derived from the module (or the MUSIC opcode's delay
//! operand), and turns note events into mixer commands. It runs from
//! the audio callback; its only engine-visible effect is the music mark,
//! published through an atomic the VM polls once per frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use byteorder::{BE, ByteOrder};
use log::{debug, warn};

use super::{MAX_VOLUME, Mixer, Sample};

/// Instrument slots per module.
pub const INSTRUMENT_COUNT: usize = 15;

/// Paula clock constant converting note periods to Hz.
const PAULA_CLOCK: u32 = 7_159_092;

/// Byte offsets inside a module resource.
const MOD_DELAY: usize = 0x00;
const MOD_INSTRUMENTS: usize = 0x02;
const MOD_NUM_ORDER: usize = 0x3E;
const MOD_ORDER_TABLE: usize = 0x40;
const MOD_PATTERNS: usize = 0xC0;

const PATTERN_SIZE: u16 = 1024;
/// Bytes consumed per tick: four channels, four bytes each.
const ROW_SIZE: u16 = 16;

/// Note word values with special meaning.
const NOTE_SYNC: u16 = 0xFFFD;
const NOTE_STOP: u16 = 0xFFFE;

/// Sentinel meaning "no pending mark" in the shared atomic.
const MARK_NONE: i32 = i32::MIN;

/// Consume a pending music-mark write, if the sequencer published one
/// since the last poll. Engine-side helper so the VM register is only
/// touched when the score actually signalled.
pub fn take_music_mark(mark: &Arc<AtomicI32>) -> Option<i16> {
    match mark.swap(MARK_NONE, Ordering::Relaxed) {
        MARK_NONE => None,
        value => Some(value as i16),
    }
}

/// An instrument: its sample resource plus the module's base volume.
#[derive(Clone)]
pub struct Instrument {
    pub sample: Sample,
    pub volume: u16,
}

/// A fully resolved module ready to sequence: the engine resolves the
/// instrument resource ids before handing it over, so the audio thread
/// never touches the resource arena.
pub struct MusicModule {
    data: Arc<[u8]>,
    instruments: [Option<Instrument>; INSTRUMENT_COUNT],
    delay: u16,
    num_order: u8,
}

impl MusicModule {
    /// Parse a music resource. `resolve` maps an instrument's resource
    /// id to its sound resource bytes.
    pub fn parse<'a>(
        resource: &[u8],
        mut resolve: impl FnMut(u16) -> Option<&'a [u8]>,
    ) -> Option<Self> {
        if resource.len() < MOD_PATTERNS {
            warn!(target: "audio", "music module too short: {} bytes", resource.len());
            return None;
        }

        let mut instruments = [const { None }; INSTRUMENT_COUNT];
        for (i, slot) in instruments.iter_mut().enumerate() {
            let entry = MOD_INSTRUMENTS + i * 4;
            let res_id = BE::read_u16(&resource[entry..]);
            if res_id == 0 {
                continue;
            }
            let volume = BE::read_u16(&resource[entry + 2..]);
            match resolve(res_id).and_then(Sample::parse) {
                Some(sample) => *slot = Some(Instrument { sample, volume }),
                None => {
                    warn!(target: "audio", "instrument resource 0x{res_id:02X} unavailable")
                }
            }
        }

        Some(Self {
            data: resource.into(),
            instruments,
            delay: BE::read_u16(&resource[MOD_DELAY..]),
            num_order: BE::read_u16(&resource[MOD_NUM_ORDER..]).min(0x80) as u8,
        })
    }
}

/// Pattern-stepping state machine over a [`MusicModule`].
pub struct SfxPlayer {
    module: Option<MusicModule>,
    cur_order: u8,
    cur_pos: u16,
    /// Output frames per sequencer tick.
    frames_per_tick: u32,
    frames_left: u32,
    sample_rate: u32,
    music_mark: Arc<AtomicI32>,
}

impl SfxPlayer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            module: None,
            cur_order: 0,
            cur_pos: 0,
            frames_per_tick: 0,
            frames_left: 0,
            sample_rate,
            music_mark: Arc::new(AtomicI32::new(MARK_NONE)),
        }
    }

    /// Handle the engine polls for pending music-mark writes.
    pub fn music_mark(&self) -> Arc<AtomicI32> {
        Arc::clone(&self.music_mark)
    }

    /// Start a module. A zero `delay` keeps the module's own tempo;
    /// `position` picks the starting order.
    pub fn play(&mut self, module: MusicModule, delay: u16, position: u8) {
        let delay = if delay == 0 { module.delay } else { delay };
        self.cur_order = position.min(module.num_order.saturating_sub(1));
        self.cur_pos = 0;
        self.module = Some(module);
        self.set_events_delay(delay);
        self.frames_left = self.frames_per_tick;
        debug!(target: "audio", "music started at order {}", self.cur_order);
    }

    /// Retune the tick period from a MUSIC opcode delay operand.
    pub fn set_events_delay(&mut self, delay: u16) {
        // The operand counts 1/7050ths of a minute.
        let ms = delay as u32 * 60 / 7050;
        self.frames_per_tick = (self.sample_rate * ms / 1000).max(1);
    }

    pub fn stop(&mut self) {
        self.module = None;
    }

    pub fn is_running(&self) -> bool {
        self.module.is_some()
    }

    /// Frames until the next tick, or `None` when no module is playing.
    pub fn frames_until_tick(&self) -> Option<u32> {
        self.module.as_ref().map(|_| self.frames_left)
    }

    /// Account for `frames` of rendered output.
    pub fn advance(&mut self, frames: u32) {
        if self.module.is_some() {
            self.frames_left = self.frames_left.saturating_sub(frames);
        }
    }

    /// Consume one pattern row and reload the tick counter.
    pub fn handle_tick(&mut self, mixer: &mut Mixer) {
        self.frames_left = self.frames_per_tick;
        let Some(module) = self.module.take() else {
            return;
        };

        let order = module.data[MOD_ORDER_TABLE + self.cur_order as usize];
        let row_start =
            MOD_PATTERNS + order as usize * PATTERN_SIZE as usize + self.cur_pos as usize;

        let mut stop = false;
        if row_start + ROW_SIZE as usize <= module.data.len() {
            for channel in 0..4u8 {
                let event = &module.data[row_start + channel as usize * 4..];
                self.handle_event(&module, channel, event, mixer);
            }
        } else {
            warn!(target: "audio", "music pattern ran off the module");
            stop = true;
        }

        self.cur_pos += ROW_SIZE;
        if self.cur_pos >= PATTERN_SIZE {
            self.cur_pos = 0;
            self.cur_order += 1;
            if self.cur_order >= module.num_order {
                stop = true;
            }
        }

        if stop {
            debug!(target: "audio", "music finished");
        } else {
            self.module = Some(module);
        }
    }

    fn handle_event(&self, module: &MusicModule, channel: u8, event: &[u8], mixer: &mut Mixer) {
        let note = BE::read_u16(&event[0..2]);
        let arg = BE::read_u16(&event[2..4]);

        match note {
            0 => {}
            NOTE_SYNC => {
                self.music_mark.store(arg as i32, Ordering::Relaxed);
            }
            NOTE_STOP => {
                mixer.stop(channel);
            }
            _ => {
                let slot = (arg >> 12) as usize;
                if slot == 0 {
                    return;
                }
                let Some(instrument) = &module.instruments[slot - 1] else {
                    return;
                };

                let mut volume = instrument.volume as i32;
                match arg >> 8 & 0x0F {
                    5 => volume = (volume + (arg & 0xFF) as i32).min(0x3F),
                    6 => volume = (volume - (arg & 0xFF) as i32).max(0),
                    _ => {}
                }

                let freq = (PAULA_CLOCK / (note as u32 * 2)).min(u16::MAX as u32) as u16;
                mixer.play(
                    channel,
                    instrument.sample.clone(),
                    freq,
                    (volume as u8).min(MAX_VOLUME),
                );
            }
        }
    }
}
