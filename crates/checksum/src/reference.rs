//! Bit-at-a-time CRC32-C.
//!
//! Slow and obviously correct. Used as the oracle for the table-driven and
//! hardware paths.

use crate::constants::crc32c::{INIT, POLYNOMIAL};

/// Advance a raw CRC register over `data`, one bit at a time.
#[must_use]
pub const fn compute(crc: u32, data: &[u8]) -> u32 {
  let mut crc = crc;
  let mut i = 0;
  while i < data.len() {
    crc ^= data[i] as u32;
    let mut bit = 0;
    while bit < 8 {
      crc = if crc & 1 != 0 { (crc >> 1) ^ POLYNOMIAL } else { crc >> 1 };
      bit += 1;
    }
    i += 1;
  }
  crc
}

/// Finalized CRC32-C of `data`.
#[must_use]
pub const fn crc32c(data: &[u8]) -> u32 {
  compute(INIT, data) ^ INIT
}

#[cfg(test)]
mod tests {
  use super::*;

  const _: () = assert!(crc32c(b"123456789") == 0xE306_9283);

  #[test]
  fn golden() {
    assert_eq!(crc32c(b"hello"), 0x9A71_BB4C);
    assert_eq!(crc32c(b"hello world"), 0xC994_65AA);
  }
}
