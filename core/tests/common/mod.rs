//! Shared test harness: builds an in-memory data set (MEMLIST + one
//! bank) around caller-supplied bytecode and polygon segments, then
//! wires a VM, resource manager, video, and audio state together the
//! way the engine does.

// Not every test binary uses every helper.
#![allow(dead_code)]

use byteorder::{BE, ByteOrder};
use otherworld_core::audio::{Audio, AudioHandle};
use otherworld_core::res::{BankSet, ResourceManager};
use otherworld_core::video::Video;
use otherworld_core::vm::{Host, VirtualMachine, VmError};

/// Ids of the lowest-numbered part's resources.
pub const PART_ID: u16 = 0x3E80;
pub const ID_PALETTES: usize = 0x14;
pub const ID_BYTECODE: usize = 0x15;
pub const ID_CINEMATIC: usize = 0x16;

/// One synthetic resource: (type byte, payload).
pub type TestResource<'a> = (u8, &'a [u8]);

/// Build MEMLIST.BIN + BANK01 images from a table of resources indexed
/// by id. Entries are stored uncompressed.
pub fn build_data_files(resources: &[Option<TestResource<'_>>]) -> BankSet {
    let mut memlist = Vec::new();
    let mut bank = Vec::new();

    for slot in resources {
        let mut record = [0u8; 20];
        if let Some((res_type, payload)) = slot {
            record[1] = *res_type;
            record[7] = 1; // bank id
            BE::write_u32(&mut record[8..12], bank.len() as u32);
            BE::write_u16(&mut record[14..16], payload.len() as u16);
            BE::write_u16(&mut record[18..20], payload.len() as u16);
            bank.extend_from_slice(payload);
        }
        memlist.extend_from_slice(&record);
    }
    memlist.push(0xFF);

    BankSet::from_slices(&[("MEMLIST.BIN", &memlist), ("BANK01", &bank)])
}

/// A resource table big enough for [`PART_ID`], with the given bytecode
/// and cinematic segment in their slots.
pub fn part_resources<'a>(
    bytecode: &'a [u8],
    cinematic: &'a [u8],
    palettes: &'a [u8],
) -> Vec<Option<TestResource<'a>>> {
    let mut table: Vec<Option<TestResource<'_>>> = vec![None; ID_CINEMATIC + 1];
    table[ID_PALETTES] = Some((3, palettes));
    table[ID_BYTECODE] = Some((4, bytecode));
    table[ID_CINEMATIC] = Some((5, cinematic));
    table
}

/// All-black palette resource: 32 palettes of 16 colors.
pub fn black_palettes() -> Vec<u8> {
    vec![0; 32 * 32]
}

/// VM + subsystems bound to a loaded test part.
pub struct TestMachine {
    pub vm: VirtualMachine,
    pub res: ResourceManager,
    pub video: Video,
    pub audio: AudioHandle,
}

impl TestMachine {
    pub fn with_bytecode(bytecode: &[u8]) -> Self {
        Self::with_segments(bytecode, &[])
    }

    pub fn with_segments(bytecode: &[u8], cinematic: &[u8]) -> Self {
        let palettes = black_palettes();
        let table = part_resources(bytecode, cinematic, &palettes);
        Self::with_resources(&table)
    }

    pub fn with_resources(table: &[Option<TestResource<'_>>]) -> Self {
        let banks = build_data_files(table);
        let mut res = ResourceManager::new(banks).expect("memlist should parse");
        let mut video = Video::new();
        res.load_part(PART_ID, |bitmap| video.copy_bitmap_to_page0(bitmap))
            .expect("part should load");

        let mut vm = VirtualMachine::new();
        vm.enter_part();

        Self {
            vm,
            res,
            video,
            audio: Audio::new(44_100),
        }
    }

    pub fn run_frame(&mut self) -> Result<(), VmError> {
        let mut host = Host {
            res: &mut self.res,
            video: &mut self.video,
            audio: &self.audio,
        };
        self.vm.run_frame(&mut host)
    }

    /// Count pixels of `color` on a page.
    pub fn count_pixels(&self, page: usize, color: u8) -> usize {
        self.video
            .page(page)
            .iter()
            .map(|&b| (b >> 4 == color) as usize + (b & 0x0F == color) as usize)
            .sum()
    }
}
