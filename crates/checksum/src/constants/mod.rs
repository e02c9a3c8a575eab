//! Precomputed constants for CRC32C.
//!
//! All tables are computed at compile time. Lookup tables are 64-byte
//! (cache line) aligned using [`Aligned64`] to prevent cache line splits
//! during table lookups.

pub mod crc32c;
pub mod tables;

/// Wrapper type to force 64-byte (cache line) alignment.
#[repr(align(64))]
pub struct Aligned64<T>(pub T);
