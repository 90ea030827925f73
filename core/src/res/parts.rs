//! Part identifiers and their resource bindings.
//!
//! A part is a scene-level bundle: one palette set, one bytecode blob,
//! one cinematic polygon segment, and for the gameplay levels a shared
//! sub-cinematic segment holding the hero and object shapes.

/// First part id understood by the LOAD opcode. Ids below this range are
/// plain resource ids.
pub const GAME_PART_FIRST: u16 = 0x3E80;
/// Last valid part id.
pub const GAME_PART_LAST: u16 = 0x3E89;

/// The code-entry protection screen.
pub const GAME_PART_PROTECTION: u16 = 0x3E80;
/// The intro cinematic; the first playable part follows it.
pub const GAME_PART_INTRO: u16 = 0x3E81;

/// Resource ids loaded for one part, in load order.
#[derive(Debug, Clone, Copy)]
pub struct PartResources {
    pub palettes: u16,
    pub bytecode: u16,
    pub cinematic: u16,
    /// 0 when the part has no sub-cinematic segment.
    pub sub_cinematic: u16,
}

/// Part table, indexed by `part_id - GAME_PART_FIRST`.
const PART_TABLE: [PartResources; 10] = [
    PartResources { palettes: 0x14, bytecode: 0x15, cinematic: 0x16, sub_cinematic: 0x00 },
    PartResources { palettes: 0x17, bytecode: 0x18, cinematic: 0x19, sub_cinematic: 0x00 },
    PartResources { palettes: 0x1A, bytecode: 0x1B, cinematic: 0x1C, sub_cinematic: 0x11 },
    PartResources { palettes: 0x1D, bytecode: 0x1E, cinematic: 0x1F, sub_cinematic: 0x11 },
    PartResources { palettes: 0x20, bytecode: 0x21, cinematic: 0x22, sub_cinematic: 0x11 },
    PartResources { palettes: 0x23, bytecode: 0x24, cinematic: 0x25, sub_cinematic: 0x00 },
    PartResources { palettes: 0x26, bytecode: 0x27, cinematic: 0x28, sub_cinematic: 0x11 },
    PartResources { palettes: 0x29, bytecode: 0x2A, cinematic: 0x2B, sub_cinematic: 0x11 },
    PartResources { palettes: 0x7D, bytecode: 0x7E, cinematic: 0x7F, sub_cinematic: 0x00 },
    PartResources { palettes: 0x7D, bytecode: 0x7E, cinematic: 0x7F, sub_cinematic: 0x00 },
];

/// Whether `id` names a part rather than a single resource.
pub fn is_part_id(id: u16) -> bool {
    (GAME_PART_FIRST..=GAME_PART_LAST).contains(&id)
}

/// Resource bindings for a part id, or `None` for out-of-range ids.
pub fn part_resources(part_id: u16) -> Option<PartResources> {
    if !is_part_id(part_id) {
        return None;
    }
    Some(PART_TABLE[(part_id - GAME_PART_FIRST) as usize])
}
