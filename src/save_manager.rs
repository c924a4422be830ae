//! Durable account snapshot storage.
//!
//! The whole account map is written as one checksummed binary snapshot
//! after every mutating operation. Writes go to a temporary file in the
//! same directory and are renamed over the previous snapshot, so an
//! interrupted write never corrupts the last good state.

use crate::account::UserAccount;
use crate::constants::{SAVE_RETRY_BACKOFF_MS, SAVE_VERSION_MAGIC, SAVE_WRITE_RETRIES};
use directories::ProjectDirs;
use log::warn;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Manages loading and saving the account map with checksum verification.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Creates a SaveManager storing at the platform config location.
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "angler").ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine config directory")
        })?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("accounts.dat"),
        })
    }

    /// Creates a SaveManager storing at an explicit path. Used by the
    /// shell's data-dir argument and by tests.
    pub fn with_path(save_path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = save_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { save_path })
    }

    /// Loads the full account map, or an empty map when no snapshot
    /// exists yet (first run).
    ///
    /// Returns an error if:
    /// - The version magic is incorrect
    /// - The checksum verification fails
    /// - The data cannot be deserialized
    pub fn load(&self) -> io::Result<HashMap<String, UserAccount>> {
        if !self.save_path.exists() {
            return Ok(HashMap::new());
        }

        let mut file = fs::File::open(&self.save_path)?;

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);

        if version != SAVE_VERSION_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid save version: expected 0x{:016X}, got 0x{:016X}",
                    SAVE_VERSION_MAGIC, version
                ),
            ));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        let computed_checksum = hasher.finalize();

        if stored_checksum != computed_checksum.as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum verification failed",
            ));
        }

        bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Durably writes the complete account map, replacing the previous
    /// snapshot. Retries transient failures with backoff before giving
    /// up; the caller rolls back its in-memory state on error.
    ///
    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - Serialized account map (variable length)
    /// - SHA256 checksum (32 bytes)
    pub fn save_all(&self, accounts: &HashMap<String, UserAccount>) -> io::Result<()> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.write_snapshot(accounts) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < SAVE_WRITE_RETRIES => {
                    warn!(
                        "snapshot write attempt {}/{} failed: {}",
                        attempt, SAVE_WRITE_RETRIES, e
                    );
                    thread::sleep(Duration::from_millis(SAVE_RETRY_BACKOFF_MS * u64::from(attempt)));
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn write_snapshot(&self, accounts: &HashMap<String, UserAccount>) -> io::Result<()> {
        let data = bincode::serialize(accounts)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        // Write the new snapshot beside the old one, then rename over it.
        let tmp_path = self.save_path.with_extension("dat.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
            file.write_all(&data_len.to_le_bytes())?;
            file.write_all(&data)?;
            file.write_all(&checksum)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.save_path)
    }

    /// Checks if a snapshot file exists.
    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &PathBuf {
        &self.save_path
    }
}
