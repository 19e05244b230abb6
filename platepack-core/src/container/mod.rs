use crate::error::Result;
use std::io::Read;

/// Seam over the archive container primitive. The engine appends entries
/// and seals; the container format itself stays behind this trait.
pub trait Container {
    /// Append a full entry read from `src`; returns the bytes consumed.
    fn add_file(&mut self, name: &str, src: &mut dyn Read) -> Result<u64>;

    /// Append a small in-memory entry.
    fn add_bytes(&mut self, name: &str, data: &[u8]) -> Result<()>;

    /// Seal the container; returns the total container size in bytes.
    fn finish(self) -> Result<u64>;
}

pub mod zipc;
