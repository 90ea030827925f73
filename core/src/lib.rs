//! Deterministic runtime for the 1991 cinematic adventure: the bytecode
//! virtual machine, the resource manager and ByteKiller decompressor,
//! the polygon rasterizer over four paletted pages, and the four-channel
//! audio mixer with its music sequencer. The platform shell (window,
//! audio device, clock, keyboard) lives in the frontend crate.

pub mod audio;
pub mod engine;
pub mod input;
pub mod res;
pub mod video;
pub mod vm;

pub mod prelude {
    pub use crate::audio::{Audio, AudioHandle, Mixer};
    pub use crate::engine::{Engine, EngineError, EngineOptions};
    pub use crate::input::{INPUT_MAP, InputButton};
    pub use crate::res::{BankSet, ResourceError, ResourceManager};
    pub use crate::video::Video;
    pub use crate::vm::{VirtualMachine, VmError};
}
