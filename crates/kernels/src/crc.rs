//! CRC32-C kernels.
//!
//! `init` and the return value are finalized digests, so calls chain:
//! `update(update(0, a), b) == crc32c(a || b)`.

use crate::chunk::{self, export_widths};

#[inline(always)]
unsafe fn crc32c_update<const W: usize>(ptr: *const u8, len: usize, init: u32) -> u32 {
  // SAFETY: caller guarantees `ptr` is readable for `len` bytes.
  let chunks = unsafe { chunk::whole::<W>(ptr, len) };
  checksum::crc32c_update(init, chunks.as_flattened())
}

export_widths! {
  /// Extend the finalized CRC32-C `init` with every whole chunk.
  crc32c_update => lanecall_crc32c_update_16, lanecall_crc32c_update_32, lanecall_crc32c_update_64
  (ptr: *const u8, len: usize, init: u32) -> u32
}

/// `crc32c(A || B)` from `crc32c(A)`, `crc32c(B)` and `len(B)`.
#[unsafe(no_mangle)]
pub extern "C" fn lanecall_crc32c_combine(crc1: u32, crc2: u32, len2: usize) -> u32 {
  checksum::crc32c_combine(crc1, crc2, len2)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whole_chunks_then_finish() {
    let data = b"0123456789abcdefXYZ";
    // SAFETY: valid buffer.
    let head = unsafe { lanecall_crc32c_update_16(data.as_ptr(), data.len(), 0) };
    assert_eq!(head, checksum::Crc32c::checksum(&data[..16]));
    assert_eq!(checksum::crc32c_update(head, &data[16..]), checksum::Crc32c::checksum(data));
  }

  #[test]
  fn identity_keeps_init() {
    // SAFETY: zero-length, never dereferenced.
    assert_eq!(unsafe { lanecall_crc32c_update_64(core::ptr::null(), 0, 0xABCD_0123) }, 0xABCD_0123);
  }

  #[test]
  fn combine_export() {
    let a = checksum::Crc32c::checksum(b"hello");
    let b = checksum::Crc32c::checksum(b" world");
    assert_eq!(lanecall_crc32c_combine(a, b, 6), 0xC994_65AA);
    assert_eq!(lanecall_crc32c_combine(a, b, 0), a);
  }
}
