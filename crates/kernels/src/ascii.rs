//! ASCII check.

use crate::chunk::{self, export_widths};

#[inline(always)]
unsafe fn is_ascii<const W: usize>(ptr: *const u8, len: usize) -> u8 {
  // SAFETY: caller guarantees `ptr` is readable for `len` bytes.
  let chunks = unsafe { chunk::whole::<W>(ptr, len) };
  let ok = chunks.iter().all(|c| c.iter().fold(0u8, |acc, &b| acc | b) < 0x80);
  u8::from(ok)
}

export_widths! {
  /// `1` if every byte of every whole chunk is below `0x80`, else `0`.
  is_ascii => lanecall_is_ascii_16, lanecall_is_ascii_32, lanecall_is_ascii_64
  (ptr: *const u8, len: usize) -> u8
}
