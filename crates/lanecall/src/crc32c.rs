//! Gateway-routed streaming CRC32-C.
//!
//! Same digest as [`checksum::Crc32c`]; bulk updates go through the active
//! backend's kernels once they clear the CRC threshold.

use traits::{Checksum, ChecksumCombine};

/// Streaming CRC32-C over the active backend.
///
/// ```
/// use lanecall::Crc32c;
/// use traits::Checksum;
///
/// let mut h = Crc32c::new();
/// h.update(b"hello ");
/// h.update(b"world");
/// assert_eq!(h.finalize(), 0xC994_65AA);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crc32c {
  crc: u32,
}

impl Checksum for Crc32c {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Self { crc: 0 }
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Self { crc: initial }
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.crc = crate::crc32c_update(self.crc, data);
  }

  #[inline]
  fn finalize(&self) -> u32 {
    self.crc
  }

  #[inline]
  fn reset(&mut self) {
    self.crc = 0;
  }
}

impl ChecksumCombine for Crc32c {
  #[inline]
  fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    crate::crc32c_combine(crc_a, crc_b, len_b)
  }
}
