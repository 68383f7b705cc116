//! Core SIQ reader module

pub mod error;
pub mod markdown;
pub mod models;
pub mod normalize;
pub mod resolve;
pub mod schema;

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use log::info;
use percent_encoding::percent_decode_str;
use zip::result::ZipError;
use zip::ZipArchive;

pub use error::{Result, SiqError};
pub use models::Package;
pub use schema::SchemaVersion;

/// Name of the mandatory payload entry at the archive root.
const CONTENT_ENTRY: &str = "content.xml";

/// The main reader for SIQ package files.
///
/// A SIQ file is a zip archive with a mandatory `content.xml` payload and
/// zero or more sibling media entries. The zip handle is held for the
/// reader's lifetime and released on drop, including when parsing fails.
#[derive(Debug)]
pub struct SiqReader {
    archive: ZipArchive<File>,
    version: Option<SchemaVersion>,
}

impl SiqReader {
    /// Open a SIQ archive at the given path.
    ///
    /// # Errors
    /// Returns an error if the path cannot be opened or is not a valid zip
    /// container.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening SIQ archive: {}", path.display());
        let file = File::open(path)?;
        let archive = ZipArchive::new(file)?;
        Ok(Self {
            archive,
            version: None,
        })
    }

    /// Read and decode the package description from `content.xml`.
    ///
    /// Detects the schema generation, decodes the payload for that
    /// generation, and records the detected generation for [`Self::version`].
    ///
    /// # Errors
    /// Returns an error if:
    /// - `content.xml` is absent (`MissingEntry`, before any decode)
    /// - the payload is not valid UTF-8
    /// - the payload is malformed for the detected generation
    pub fn read(&mut self) -> Result<Package> {
        let bytes = self.read_entry(CONTENT_ENTRY)?;
        let payload = std::str::from_utf8(&bytes)?;

        let version = schema::detect(payload);
        info!("Detected schema generation: {version}");

        let package = schema::decode(payload, version)?;
        self.version = Some(version);
        Ok(package)
    }

    /// The schema generation detected by the last successful [`Self::read`].
    pub fn version(&self) -> Option<SchemaVersion> {
        self.version
    }

    /// Entry names in archive order.
    ///
    /// # Errors
    /// Returns an error if any entry's metadata cannot be read; no entry is
    /// skipped silently.
    pub fn list_entries(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            names.push(self.archive.by_index(index)?.name().to_string());
        }
        Ok(names)
    }

    /// Read a single entry into memory.
    ///
    /// The name may be percent-encoded; lookup matches the full relative
    /// path exactly, case-sensitively.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let index = self.entry_index(name)?;
        let mut entry = self.archive.by_index(index)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Extract an entry to a filesystem path, creating missing parent
    /// directories.
    ///
    /// # Errors
    /// Returns `MissingEntry` if the entry is absent, or `Io` on any
    /// filesystem failure.
    pub fn extract_entry(&mut self, name: &str, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();
        let index = self.entry_index(name)?;
        let mut entry = self.archive.by_index(index)?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(dest)?;
        std::io::copy(&mut entry, &mut out)?;
        info!("Extracted {name} to {}", dest.display());
        Ok(())
    }

    /// Find an entry's index by name, accepting percent-encoded names.
    ///
    /// The supplied name is decoded first; if decoding fails the raw string
    /// is used as-is. Both the decoded and raw spellings are compared against
    /// each entry's full path.
    fn entry_index(&mut self, name: &str) -> Result<usize> {
        let decoded = percent_decode_str(name)
            .decode_utf8()
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| name.to_string());

        for index in 0..self.archive.len() {
            let entry = match self.archive.by_index(index) {
                Ok(entry) => entry,
                Err(ZipError::FileNotFound) => continue,
                Err(err) => return Err(err.into()),
            };
            if entry.name() == decoded || entry.name() == name {
                return Ok(index);
            }
        }
        Err(SiqError::MissingEntry(name.to_string()))
    }
}
