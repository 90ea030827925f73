//! Engine glue: wires the resource manager, VM, video, and audio into a
//! frame-stepped machine the frontend can drive.
//!
//! The frontend owns the window, the audio device, and the clock. Each
//! frame it latches input events into the engine, calls [`Engine::run_frame`],
//! renders [`Engine::render_frame`] into its texture, and sleeps for
//! [`Engine::frame_delay_ms`]. Audio is pulled independently by the
//! backend's callback through the shared [`AudioHandle`].

use std::sync::Arc;
use std::sync::atomic::AtomicI32;

use log::debug;

use crate::audio::{Audio, AudioHandle, sfx};
use crate::input::{INPUT_MAP, InputButton, InputState};
use crate::res::{BankSet, ResourceError, ResourceManager, parts};
use crate::video::{SCREEN_H, SCREEN_W, Video};
use crate::vm::{Host, VirtualMachine, VmError, vars};

/// Milliseconds per pause slice; the engine's tick unit.
pub const TICK_MS: u32 = 20;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Fatal engine faults: asset loading and interpreter errors.
#[derive(Debug)]
pub enum EngineError {
    Resource(ResourceError),
    Vm(VmError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resource(e) => write!(f, "{e}"),
            Self::Vm(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<ResourceError> for EngineError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

impl From<VmError> for EngineError {
    fn from(e: VmError) -> Self {
        Self::Vm(e)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Start-up options decided by the command line.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Initial part id ([`parts::GAME_PART_FIRST`]-based).
    pub part: u16,
    /// Seed the protection registers instead of playing the code screen.
    pub skip_protection: bool,
    /// Seed for the random-number register.
    pub rng_seed: u16,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            part: parts::GAME_PART_INTRO,
            skip_protection: false,
            rng_seed: 0xBEEF,
        }
    }
}

pub struct Engine {
    vm: VirtualMachine,
    res: ResourceManager,
    video: Video,
    audio: AudioHandle,
    music_mark: Arc<AtomicI32>,
    input: InputState,
    rng: u16,
    options: EngineOptions,
}

impl Engine {
    /// Build an engine over a bank set and start it at the configured
    /// part.
    pub fn new(
        banks: BankSet,
        audio: AudioHandle,
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let music_mark = audio.lock().unwrap().player.music_mark();
        let mut engine = Self {
            vm: VirtualMachine::new(),
            res: ResourceManager::new(banks)?,
            video: Video::new(),
            audio,
            music_mark,
            input: InputState::default(),
            rng: options.rng_seed,
            options,
        };
        engine.vm.set_reg(vars::VAR_RANDOM_SEED, options.rng_seed as i16);
        if options.skip_protection {
            engine.vm.bypass_protection();
        }
        engine.change_part(options.part)?;
        Ok(engine)
    }

    /// Native display resolution as (width, height) in pixels.
    pub fn display_size(&self) -> (u32, u32) {
        (SCREEN_W as u32, SCREEN_H as u32)
    }

    /// Run one frame: apply any pending part switch, reflect input, run
    /// a VM slice, and settle the palette for presentation.
    pub fn run_frame(&mut self) -> Result<(), EngineError> {
        if let Some(part) = self.res.requested_part() {
            self.change_part(part)?;
        }

        self.reflect_input();
        self.stir_random_seed();
        if let Some(mark) = sfx::take_music_mark(&self.music_mark) {
            debug!(target: "engine", "music mark {mark}");
            self.vm.set_reg(vars::VAR_MUSIC_MARK, mark);
        }

        let mut host = Host {
            res: &mut self.res,
            video: &mut self.video,
            audio: &self.audio,
        };
        self.vm.run_frame(&mut host)?;

        self.video.apply_requested_palette(self.res.palettes());
        Ok(())
    }

    /// How long the frontend should wait before the next frame, per the
    /// bytecode's pause-slice register.
    pub fn frame_delay_ms(&self) -> u32 {
        let slices = self.vm.reg(vars::VAR_PAUSE_SLICES).max(1) as u32;
        slices * TICK_MS
    }

    /// Render the displayed page into an RGB24 pixel buffer
    /// (`SCREEN_W × SCREEN_H × 3` bytes).
    pub fn render_frame(&self, buffer: &mut [u8]) {
        self.video.render_frame(buffer);
    }

    /// Latch a button event. Called per-event, not per-frame.
    pub fn set_input(&mut self, button: u8, pressed: bool) {
        self.input.set_button(button, pressed);
    }

    /// Latch a typed character for the code-entry screens. Only
    /// backspace and the upper-case letters reach the bytecode.
    pub fn key_char(&mut self, ch: u8) {
        let ch = ch.to_ascii_uppercase();
        if ch == 8 || ch.is_ascii_uppercase() {
            self.input.last_char = ch;
        }
    }

    pub fn input_map(&self) -> &'static [InputButton] {
        INPUT_MAP
    }

    /// Restart from the configured initial part with a fresh VM.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.vm = VirtualMachine::new();
        self.vm.set_reg(vars::VAR_RANDOM_SEED, self.options.rng_seed as i16);
        if self.options.skip_protection {
            self.vm.bypass_protection();
        }
        self.change_part(self.options.part)
    }

    /// Read a VM register; the frontend uses this for diagnostics only.
    pub fn vm_reg(&self, index: usize) -> i16 {
        self.vm.reg(index)
    }

    /// The part currently bound, if the initial load has happened.
    pub fn current_part(&self) -> Option<u16> {
        self.res.current_part()
    }

    fn change_part(&mut self, part: u16) -> Result<(), EngineError> {
        // Channels hold sample memory that goes away with the arena.
        {
            let mut audio = self.audio.lock().unwrap();
            audio.player.stop();
            audio.mixer.stop_all();
        }
        let video = &mut self.video;
        self.res.load_part(part, |bitmap| video.copy_bitmap_to_page0(bitmap))?;
        self.vm.enter_part();
        debug!(target: "engine", "entered part 0x{part:04X}");
        Ok(())
    }

    /// Reflect latched input into the VM's input registers.
    fn reflect_input(&mut self) {
        let input = &self.input;
        let mut mask = 0i16;
        let mut lr = 0i16;
        let mut ud = 0i16;
        let mut jd = 0i16;

        if input.right {
            lr = 1;
            mask |= 1;
        }
        if input.left {
            lr = -1;
            mask |= 2;
        }
        if input.down {
            ud = 1;
            jd = 1;
            mask |= 4;
        }
        if input.up {
            ud = -1;
            jd = -1;
            mask |= 8;
        }

        self.vm.set_reg(vars::VAR_HERO_POS_UP_DOWN, ud);
        self.vm.set_reg(vars::VAR_HERO_POS_JUMP_DOWN, jd);
        self.vm.set_reg(vars::VAR_HERO_POS_LEFT_RIGHT, lr);
        self.vm.set_reg(vars::VAR_HERO_POS_MASK, mask);

        if input.action {
            self.vm.set_reg(vars::VAR_HERO_ACTION, 1);
            mask |= 0x80;
        } else {
            self.vm.set_reg(vars::VAR_HERO_ACTION, 0);
        }
        self.vm.set_reg(vars::VAR_HERO_ACTION_POS_MASK, mask);

        if self.input.last_char != 0 {
            self.vm.set_reg(vars::VAR_LAST_KEY, self.input.last_char as i16);
            self.input.last_char = 0;
        }
    }

    /// Xorshift step over the random-seed register, once per frame.
    fn stir_random_seed(&mut self) {
        let mut seed = self.rng;
        seed ^= seed << 7;
        seed ^= seed >> 9;
        seed ^= seed << 8;
        self.rng = seed;
        self.vm.set_reg(vars::VAR_RANDOM_SEED, seed as i16);
    }
}

/// Convenience constructor used by the frontend: audio state plus the
/// engine bound to it.
pub fn create(
    banks: BankSet,
    sample_rate: u32,
    options: EngineOptions,
) -> Result<(Engine, AudioHandle), EngineError> {
    let audio = Audio::new(sample_rate);
    let engine = Engine::new(banks, Arc::clone(&audio), options)?;
    Ok((engine, audio))
}
