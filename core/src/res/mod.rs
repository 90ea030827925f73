//! Resource management: the MEMLIST table of contents, on-demand loading
//! from the bank files, and per-part resource binding.
//!
//! Every asset the bytecode can name is a numbered entry in MEMLIST. An
//! entry is loaded into the bump arena when a part is entered or when the
//! LOAD opcode requests it mid-part. Bitmap entries are the exception:
//! their pixels go straight to video page 0 and the entry is not retained.

pub mod arena;
pub mod banks;
pub mod parts;
pub mod unpack;

use byteorder::{BE, ByteOrder};
use log::{debug, warn};

use arena::{ArenaHandle, MemArena};
pub use banks::BankSet;
use unpack::UnpackError;

/// Memlist record size on disk.
const MEMLIST_ENTRY_SIZE: usize = 20;
/// State byte marking the end of the memlist.
const MEMLIST_END: u8 = 0xFF;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading game data.
#[derive(Debug)]
pub enum ResourceError {
    /// Underlying I/O error (directory unreadable, etc.)
    Io(std::io::Error),

    /// MEMLIST.BIN was not found in the data directory.
    MissingMemlist,

    /// A referenced bank file was not found.
    MissingBank(u8),

    /// MEMLIST.BIN is truncated or contains an invalid record.
    MalformedMemlist { offset: usize },

    /// A resource's payload extends past the end of its bank.
    ShortRead { id: u16, bank_id: u8 },

    /// ByteKiller decompression failed for a resource.
    Corrupt { id: u16, cause: UnpackError },

    /// The arena cannot hold the resource.
    ArenaFull { id: u16 },

    /// A part id outside the part table was requested.
    BadPart(u16),
}

impl std::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingMemlist => write!(f, "MEMLIST.BIN not found in data directory"),
            Self::MissingBank(id) => write!(f, "missing bank file BANK{id:02X}"),
            Self::MalformedMemlist { offset } => {
                write!(f, "malformed MEMLIST record at offset 0x{offset:X}")
            }
            Self::ShortRead { id, bank_id } => {
                write!(f, "resource 0x{id:02X}: short read from BANK{bank_id:02X}")
            }
            Self::Corrupt { id, cause } => write!(f, "resource 0x{id:02X}: {cause}"),
            Self::ArenaFull { id } => write!(f, "resource 0x{id:02X}: arena exhausted"),
            Self::BadPart(id) => write!(f, "invalid part id 0x{id:04X}"),
        }
    }
}

impl std::error::Error for ResourceError {}

impl From<std::io::Error> for ResourceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Memlist entries
// ---------------------------------------------------------------------------

/// Asset type of a MEMLIST entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResType {
    /// 8-bit signed PCM sample, loaded by the SOUND/LOAD opcodes.
    Sound,
    /// Music module (order table + patterns + instrument references).
    Music,
    /// Full-screen 4-plane bitmap, blitted to page 0 at load time.
    Bitmap,
    /// 32 palettes of 16 colors, bound per part.
    Palette,
    /// Bytecode blob, bound per part.
    Bytecode,
    /// Cinematic polygon segment, bound per part.
    Cinematic,
    /// Sub-cinematic ("video2") polygon segment shared by gameplay parts.
    SubCinematic,
}

impl ResType {
    fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Sound),
            1 => Some(Self::Music),
            2 => Some(Self::Bitmap),
            3 => Some(Self::Palette),
            4 => Some(Self::Bytecode),
            5 => Some(Self::Cinematic),
            6 => Some(Self::SubCinematic),
            _ => None,
        }
    }
}

/// Load state of a MEMLIST entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotNeeded,
    Loaded,
    RequestedLoad,
    RequestedPurge,
}

/// One parsed MEMLIST record.
#[derive(Debug)]
pub struct MemEntry {
    pub state: LoadState,
    pub res_type: ResType,
    pub rank: u8,
    pub bank_id: u8,
    pub bank_offset: u32,
    pub packed_size: u16,
    pub unpacked_size: u16,
    handle: Option<ArenaHandle>,
}

// ---------------------------------------------------------------------------
// Resource manager
// ---------------------------------------------------------------------------

/// Arena handles for the four resources bound to the current part.
#[derive(Debug, Default, Clone, Copy)]
struct PartBindings {
    palettes: Option<ArenaHandle>,
    bytecode: Option<ArenaHandle>,
    cinematic: Option<ArenaHandle>,
    sub_cinematic: Option<ArenaHandle>,
}

/// Owns the MEMLIST table, the arena, and the current-part bindings.
pub struct ResourceManager {
    banks: BankSet,
    entries: Vec<MemEntry>,
    arena: MemArena,
    bindings: PartBindings,
    /// Arena watermark right after the part's four resources were loaded.
    /// LOAD-0 rolls back to here, reclaiming mid-part sound loads.
    part_watermark: usize,
    current_part: Option<u16>,
    /// One-step lookahead written by the LOAD opcode; applied by the
    /// engine between frames.
    requested_part: Option<u16>,
}

impl ResourceManager {
    /// Parse MEMLIST.BIN from the bank set and build the entry table.
    pub fn new(banks: BankSet) -> Result<Self, ResourceError> {
        let entries = Self::parse_memlist(banks.memlist()?)?;
        debug!(target: "resources", "memlist: {} entries", entries.len());
        Ok(Self {
            banks,
            entries,
            arena: MemArena::new(),
            bindings: PartBindings::default(),
            part_watermark: 0,
            current_part: None,
            requested_part: None,
        })
    }

    fn parse_memlist(data: &[u8]) -> Result<Vec<MemEntry>, ResourceError> {
        let mut entries = Vec::new();
        let mut offset = 0;
        loop {
            if offset + 1 > data.len() {
                return Err(ResourceError::MalformedMemlist { offset });
            }
            if data[offset] == MEMLIST_END {
                break;
            }
            if offset + MEMLIST_ENTRY_SIZE > data.len() {
                return Err(ResourceError::MalformedMemlist { offset });
            }
            let rec = &data[offset..offset + MEMLIST_ENTRY_SIZE];

            // state:u8 type:u8 bufptr:u16 unused:u16 rank:u8 bank:u8
            // offset:u32 unused:u16 packed:u16 unused:u16 unpacked:u16
            let res_type = ResType::from_raw(rec[1])
                .ok_or(ResourceError::MalformedMemlist { offset })?;
            let packed_size = BE::read_u16(&rec[14..16]);
            let unpacked_size = BE::read_u16(&rec[18..20]);
            if packed_size > unpacked_size {
                return Err(ResourceError::MalformedMemlist { offset });
            }

            entries.push(MemEntry {
                state: LoadState::NotNeeded,
                res_type,
                rank: rec[6],
                bank_id: rec[7],
                bank_offset: BE::read_u32(&rec[8..12]),
                packed_size,
                unpacked_size,
                handle: None,
            });
            offset += MEMLIST_ENTRY_SIZE;
        }
        Ok(entries)
    }

    pub fn entry(&self, id: u16) -> Option<&MemEntry> {
        self.entries.get(id as usize)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn current_part(&self) -> Option<u16> {
        self.current_part
    }

    /// Part id queued by the LOAD opcode, if any.
    pub fn requested_part(&self) -> Option<u16> {
        self.requested_part
    }

    pub fn request_part(&mut self, part_id: u16) {
        self.requested_part = Some(part_id);
    }

    /// Mark a resource for loading on the next `update()`. Unknown ids are
    /// logged and ignored (the opcode becomes a no-op).
    pub fn request_load(&mut self, id: u16) {
        match self.entries.get_mut(id as usize) {
            Some(entry) if entry.state == LoadState::NotNeeded => {
                entry.state = LoadState::RequestedLoad;
            }
            Some(_) => {}
            None => warn!(target: "resources", "request_load: unknown resource 0x{id:02X}"),
        }
    }

    /// Purge every loaded entry and drop the whole arena. Used on part
    /// changes; the purge completes immediately so the new part can
    /// re-request ids the old part also used.
    pub fn invalidate_all(&mut self) {
        for entry in &mut self.entries {
            if entry.state != LoadState::NotNeeded {
                entry.state = LoadState::RequestedPurge;
            }
        }
        self.process_purges();
        self.arena.reset();
        self.bindings = PartBindings::default();
        self.part_watermark = 0;
    }

    /// Purge everything loaded after the current part's own resources
    /// (the LOAD-0 path). The caller must stop audio playback first.
    pub fn invalidate_transient(&mut self) {
        for entry in &mut self.entries {
            let keep = matches!(
                entry.res_type,
                ResType::Palette | ResType::Bytecode | ResType::Cinematic | ResType::SubCinematic
            );
            if !keep && entry.state != LoadState::NotNeeded {
                entry.state = LoadState::RequestedPurge;
            }
        }
        self.arena.rollback(self.part_watermark);
        self.process_purges();
    }

    fn process_purges(&mut self) {
        for entry in &mut self.entries {
            if entry.state == LoadState::RequestedPurge {
                entry.state = LoadState::NotNeeded;
                entry.handle = None;
            }
        }
    }

    /// Load every entry in `RequestedLoad` state, in id order. Bitmap
    /// payloads are handed to `on_bitmap` instead of being retained.
    pub fn update(
        &mut self,
        mut on_bitmap: impl FnMut(&[u8]),
    ) -> Result<(), ResourceError> {
        self.process_purges();
        for id in 0..self.entries.len() {
            if self.entries[id].state != LoadState::RequestedLoad {
                continue;
            }
            self.load_entry(id as u16, &mut on_bitmap)?;
        }
        Ok(())
    }

    fn load_entry(
        &mut self,
        id: u16,
        on_bitmap: &mut impl FnMut(&[u8]),
    ) -> Result<(), ResourceError> {
        let (bank_id, bank_offset, packed, unpacked, res_type) = {
            let e = &self.entries[id as usize];
            (
                e.bank_id,
                e.bank_offset as usize,
                e.packed_size as usize,
                e.unpacked_size as usize,
                e.res_type,
            )
        };

        if unpacked == 0 {
            // Zero-size entries exist in the table; nothing to do.
            self.entries[id as usize].state = LoadState::NotNeeded;
            return Ok(());
        }

        let rollback_mark = self.arena.watermark();
        let handle = self
            .arena
            .alloc(unpacked)
            .ok_or(ResourceError::ArenaFull { id })?;

        {
            let bank = self.banks.bank(bank_id)?;
            if bank_offset + packed > bank.len() {
                return Err(ResourceError::ShortRead { id, bank_id });
            }
            let dst = self.arena.slice_mut(handle);
            dst[..packed].copy_from_slice(&bank[bank_offset..bank_offset + packed]);
        }

        if packed != unpacked {
            unpack::unpack_in_place(self.arena.slice_mut(handle), packed)
                .map_err(|cause| ResourceError::Corrupt { id, cause })?;
        }

        debug!(
            target: "resources",
            "loaded 0x{id:02X} ({res_type:?}) {packed} -> {unpacked} bytes"
        );

        if res_type == ResType::Bitmap {
            // Bitmaps decode to page 0 and are not kept in memory.
            on_bitmap(self.arena.slice(handle));
            self.arena.rollback(rollback_mark);
            self.entries[id as usize].state = LoadState::NotNeeded;
        } else {
            let entry = &mut self.entries[id as usize];
            entry.handle = Some(handle);
            entry.state = LoadState::Loaded;
        }
        Ok(())
    }

    /// Switch to a part: purge everything, load the part's four resources,
    /// and bind them. `on_bitmap` receives any bitmap side-loads.
    pub fn load_part(
        &mut self,
        part_id: u16,
        on_bitmap: impl FnMut(&[u8]),
    ) -> Result<(), ResourceError> {
        let part = parts::part_resources(part_id).ok_or(ResourceError::BadPart(part_id))?;

        debug!(target: "resources", "load_part 0x{part_id:04X}");
        self.invalidate_all();
        self.request_load(part.palettes);
        self.request_load(part.bytecode);
        self.request_load(part.cinematic);
        if part.sub_cinematic != 0 {
            self.request_load(part.sub_cinematic);
        }
        self.update(on_bitmap)?;

        let bindings = PartBindings {
            palettes: self.entry_handle(part.palettes),
            bytecode: self.entry_handle(part.bytecode),
            cinematic: self.entry_handle(part.cinematic),
            sub_cinematic: if part.sub_cinematic != 0 {
                self.entry_handle(part.sub_cinematic)
            } else {
                None
            },
        };
        if bindings.bytecode.is_none() {
            return Err(ResourceError::BadPart(part_id));
        }
        self.bindings = bindings;
        self.part_watermark = self.arena.watermark();
        self.current_part = Some(part_id);
        self.requested_part = None;
        Ok(())
    }

    /// Bytes of a loaded resource, or `None` if it is not resident.
    pub fn resource_bytes(&self, id: u16) -> Option<&[u8]> {
        let handle = self.entries.get(id as usize)?.handle?;
        Some(self.arena.slice(handle))
    }

    /// The current part's palette data (32 palettes × 32 bytes).
    pub fn palettes(&self) -> &[u8] {
        self.bound(self.bindings.palettes)
    }

    /// The current part's bytecode.
    pub fn bytecode(&self) -> &[u8] {
        self.bound(self.bindings.bytecode)
    }

    /// The current part's cinematic polygon segment.
    pub fn cinematic(&self) -> &[u8] {
        self.bound(self.bindings.cinematic)
    }

    /// The current part's sub-cinematic polygon segment (empty when the
    /// part has none).
    pub fn sub_cinematic(&self) -> &[u8] {
        self.bound(self.bindings.sub_cinematic)
    }

    fn entry_handle(&self, id: u16) -> Option<ArenaHandle> {
        self.entries.get(id as usize).and_then(|e| e.handle)
    }

    fn bound(&self, handle: Option<ArenaHandle>) -> &[u8] {
        match handle {
            Some(h) => self.arena.slice(h),
            None => &[],
        }
    }
}
