//! Register indices with engine-assigned meaning. Everything not listed
//! here is general-purpose scratch for the bytecode.

/// Seeded at startup and stirred once per frame.
pub const VAR_RANDOM_SEED: usize = 0x3C;
/// ASCII code of the last typed key (code-entry screens read this).
pub const VAR_LAST_KEY: usize = 0xDA;
/// Vertical hero intent, -1/0/1.
pub const VAR_HERO_POS_UP_DOWN: usize = 0xE5;
/// Written by the music sequencer for script synchronization.
pub const VAR_MUSIC_MARK: usize = 0xF4;
/// Frame counter cleared by the SHOW opcode.
pub const VAR_FRAME_COUNTER: usize = 0xF7;
/// Vertical scroll applied by the COPY opcode's scroll path.
pub const VAR_SCROLL_Y: usize = 0xF9;
/// 1 while the action button is held.
pub const VAR_HERO_ACTION: usize = 0xFA;
/// Vertical intent again; jump shares the up direction.
pub const VAR_HERO_POS_JUMP_DOWN: usize = 0xFB;
/// Horizontal hero intent, -1/0/1.
pub const VAR_HERO_POS_LEFT_RIGHT: usize = 0xFC;
/// D-pad bitmask: right=1, left=2, down=4, up=8.
pub const VAR_HERO_POS_MASK: usize = 0xFD;
/// D-pad bitmask with 0x80 set while the action button is held.
pub const VAR_HERO_ACTION_POS_MASK: usize = 0xFE;
/// Frame delay requested by the bytecode, in 20 ms slices.
pub const VAR_PAUSE_SLICES: usize = 0xFF;
