//! Content hash identifying a stored object
//!
//! Ids are 40-character lowercase hexadecimal SHA-1 digests. On disk an object lives
//! at `objects/<first-2-chars>/<remaining-38-chars>`; inside tree payloads an id is
//! written as its 20 raw bytes.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::DvcError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate a full-length hex id
    ///
    /// Uppercase digits are accepted and normalized, anything else fails with
    /// `InvalidCommitId` since ids typed by users are nearly always commit ids.
    pub fn try_parse(id: impl AsRef<str>) -> anyhow::Result<Self> {
        let id = id.as_ref();

        if !Self::is_well_formed(id) {
            return Err(DvcError::InvalidCommitId(id.to_string()).into());
        }

        Ok(Self(id.to_ascii_lowercase()))
    }

    pub fn is_well_formed(id: &str) -> bool {
        id.len() == OBJECT_ID_LENGTH && id.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Hex-encode a finished SHA-1 digest
    pub fn from_digest(digest: &[u8]) -> Self {
        Self(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Write the id as 20 raw bytes
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&self.0[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an id stored as 20 raw bytes
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_LENGTH / 2];
        reader.read_exact(&mut raw)?;

        Ok(Self::from_digest(&raw))
    }

    /// Sharded location relative to the objects directory, `ab/cdef...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    pub fn to_short_oid(&self) -> String {
        self.0[..7].to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
