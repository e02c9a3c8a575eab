//! Portable CRC32-C using slicing-by-8.
//!
//! Each 8-byte block is folded into the register with eight independent
//! table lookups, which hides most of the lookup latency.

use crate::constants::crc32c::TABLES;

/// Advance a raw (non-inverted) CRC register over `data`.
#[inline]
#[allow(dead_code)] // Unused when a hardware CRC is enabled at compile time.
pub fn compute(crc: u32, data: &[u8]) -> u32 {
  let t = &TABLES.0;
  let mut crc = crc;
  let (blocks, tail) = data.as_chunks::<8>();

  for block in blocks {
    let d = u64::from_le_bytes(*block);
    let lo = u64::from(crc) ^ (d & 0xFFFF_FFFF);
    let hi = d >> 32;

    // Table 7 takes the oldest byte, table 0 the newest.
    crc = t[7][lo as u8 as usize]
      ^ t[6][(lo >> 8) as u8 as usize]
      ^ t[5][(lo >> 16) as u8 as usize]
      ^ t[4][(lo >> 24) as u8 as usize]
      ^ t[3][hi as u8 as usize]
      ^ t[2][(hi >> 8) as u8 as usize]
      ^ t[1][(hi >> 16) as u8 as usize]
      ^ t[0][(hi >> 24) as u8 as usize];
  }

  for &byte in tail {
    crc = compute_byte(crc, byte);
  }

  crc
}

/// Advance a raw CRC register by a single byte.
#[inline]
pub const fn compute_byte(crc: u32, byte: u8) -> u32 {
  let idx = (crc as u8 ^ byte) as usize;
  (crc >> 8) ^ crate::constants::crc32c::TABLE[idx]
}
