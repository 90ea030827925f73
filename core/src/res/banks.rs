//! Data-file access for the shipped asset set.
//!
//! Supports loading the MEMLIST table of contents and the BANK01..BANK0D
//! payload files from a data directory, or from programmatic byte slices
//! (for testing). File names are matched case-insensitively because the
//! assets circulated with both upper- and lower-case names.

use std::collections::HashMap;
use std::path::Path;

use super::ResourceError;

/// Name of the table-of-contents file inside the data directory.
pub const MEMLIST_NAME: &str = "MEMLIST.BIN";

/// A collection of data files loaded from disk or provided programmatically.
pub struct BankSet {
    files: HashMap<String, Vec<u8>>,
}

impl BankSet {
    /// Create a BankSet from a directory of game data files.
    ///
    /// Reads all files in the directory (non-recursive) and stores them
    /// by upper-cased filename (without path).
    pub fn from_directory(path: &Path) -> Result<Self, ResourceError> {
        let mut files = HashMap::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();
            if file_path.is_file() {
                let name = file_path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_uppercase();
                let data = std::fs::read(&file_path)?;
                files.insert(name, data);
            }
        }
        Ok(Self { files })
    }

    /// Create a BankSet from programmatic byte slices (for testing).
    ///
    /// Each entry is a (filename, data) pair.
    pub fn from_slices(entries: &[(&str, &[u8])]) -> Self {
        let mut files = HashMap::new();
        for (name, data) in entries {
            files.insert(name.to_uppercase(), data.to_vec());
        }
        Self { files }
    }

    /// Get the MEMLIST data, or an error if the file is missing.
    pub fn memlist(&self) -> Result<&[u8], ResourceError> {
        self.files
            .get(MEMLIST_NAME)
            .map(|v| v.as_slice())
            .ok_or(ResourceError::MissingMemlist)
    }

    /// Get the payload file for a bank id (`BANK01`..`BANK0D`).
    pub fn bank(&self, bank_id: u8) -> Result<&[u8], ResourceError> {
        let name = format!("BANK{bank_id:02X}");
        self.files
            .get(&name)
            .map(|v| v.as_slice())
            .ok_or(ResourceError::MissingBank(bank_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_names_are_hex_and_case_insensitive() {
        let set = BankSet::from_slices(&[("bank0d", &[1, 2, 3]), ("MEMLIST.BIN", &[])]);
        assert_eq!(set.bank(13).unwrap(), &[1, 2, 3]);
        assert!(set.memlist().is_ok());
        assert!(matches!(set.bank(1), Err(ResourceError::MissingBank(1))));
    }
}
