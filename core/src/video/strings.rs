//! String table for the PRINT opcode.
//!
//! The shipped bytecode refers to text by id; the table itself lived in
//! the interpreter, not the data files. Entries are sorted by id so
//! lookups can binary-search.

const STRINGS: &[(u16, &str)] = &[
    (0x001, "P E A N U T  3000"),
    (0x002, "Copyright  } 1990 Peanut Computer, Inc.\nAll rights reserved.\n\nCHAPTER : DOCTOR"),
    (0x003, "ACCESS CODE:"),
    (0x004, "PRESS ENTER WHEN READY"),
    (0x005, "ACCESS CODE INCORRECT !\nPLEASE TRY AGAIN."),
    (0x006, "ENTER COMMAND:"),
    (0x007, "RUN EXPERIMENT ? Y/N"),
    (0x008, "LOADING DATA..."),
    (0x00A, "PARTICLE ACCELERATOR ON LINE"),
    (0x00B, "POWER LEVEL: 100%"),
    (0x00C, "TARGET CHAMBER SEALED"),
    (0x00D, "COUNTDOWN STARTED"),
    (0x00E, "5"),
    (0x00F, "4"),
    (0x010, "3"),
    (0x011, "2"),
    (0x012, "1"),
    (0x013, "0"),
    (0x014, "EXPERIMENT IN PROGRESS"),
    (0x015, "ANOMALY DETECTED"),
    (0x016, "RADIATION LEVEL CRITICAL"),
    (0x017, "EVACUATE THE LABORATORY"),
    (0x091, "GOOD LUCK"),
    (0x097, "ENTER ACCESS CODE"),
    (0x098, "INVALID PASSWORD !"),
    (0x187, "CONTINUE"),
    (0x190, "PRESS BUTTON OR RETURN TO CONTINUE"),
    (0x191, "   ENTER ACCESS CODE"),
    (0x192, "   INVALID PASSWORD !"),
    (0x193, "ANNULER"),
    (0x194, "      INSERT DISK ?\n\n\n\n\n\n\n\n\nPRESS ANY KEY TO CONTINUE"),
    (0x198, " SELECT SKILL LEVEL ?\n\n\n\n EASY\n\n NORMAL\n\n EXPERT"),
    (0x199, "        PAUSED"),
    (0x2A0, "GAME OVER"),
    (0x2A1, "THE END"),
];

/// Text for a string id, or `None` when the id is unknown.
pub fn lookup(id: u16) -> Option<&'static str> {
    STRINGS
        .binary_search_by_key(&id, |&(key, _)| key)
        .ok()
        .map(|i| STRINGS[i].1)
}
