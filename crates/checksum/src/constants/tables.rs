//! Const-fn lookup table generation for 32-bit reflected CRCs.

// SAFETY: All array indexing in this module uses bounded loop indices (0..256, 0..8).
// Clippy cannot prove this in const fn contexts, but bounds are statically guaranteed.
#![allow(clippy::indexing_slicing)]

/// Generate the base lookup table (table 0) for a reflected polynomial.
#[must_use]
pub const fn generate_table_0_32(poly: u32) -> [u32; 256] {
  let mut table = [0u32; 256];
  let mut i = 0usize;

  while i < 256 {
    let mut crc = i as u32;
    let mut j = 0;
    while j < 8 {
      if crc & 1 != 0 {
        crc = (crc >> 1) ^ poly;
      } else {
        crc >>= 1;
      }
      j += 1;
    }
    table[i] = crc;
    i += 1;
  }

  table
}

/// Generate the 8 slicing tables for a reflected polynomial.
///
/// `tables[t][i]` is the contribution of byte value `i` located `t` bytes
/// before the end of an 8-byte block.
#[must_use]
pub const fn generate_slicing_tables_32(poly: u32) -> [[u32; 256]; 8] {
  let table0 = generate_table_0_32(poly);
  let mut tables = [[0u32; 256]; 8];

  let mut i = 0;
  while i < 256 {
    tables[0][i] = table0[i];
    i += 1;
  }

  let mut t = 1;
  while t < 8 {
    let mut i = 0;
    while i < 256 {
      let prev = tables[t - 1][i];
      tables[t][i] = (prev >> 8) ^ table0[(prev & 0xFF) as usize];
      i += 1;
    }
    t += 1;
  }

  tables
}
