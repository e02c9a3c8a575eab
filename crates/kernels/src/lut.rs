//! 256-entry lookup table kernels: set membership and byte mapping.
//!
//! `lut` must point to 256 readable bytes whenever at least one whole chunk
//! is processed.

#![allow(clippy::indexing_slicing)] // u8 index into [u8; 256]

use crate::chunk::{self, export_widths};

type Lut = [u8; 256];

#[inline(always)]
unsafe fn validate_u8_lut<const W: usize>(ptr: *const u8, len: usize, lut: *const u8) -> u8 {
  // SAFETY: caller guarantees `ptr` is readable for `len` bytes.
  let chunks = unsafe { chunk::whole::<W>(ptr, len) };
  if chunks.is_empty() || lut.is_null() {
    return 1;
  }
  // SAFETY: caller guarantees 256 readable bytes at `lut`.
  let lut = unsafe { &*lut.cast::<Lut>() };
  let ok = chunks
    .iter()
    .all(|c| c.iter().fold(0xFFu8, |acc, &b| acc & u8::from(lut[b as usize] != 0)) != 0);
  u8::from(ok)
}

#[inline(always)]
unsafe fn map_u8_lut<const W: usize>(src: *const u8, len: usize, dst: *mut u8, lut: *const u8) {
  // SAFETY: caller guarantees `src` is readable for `len` bytes.
  let input = unsafe { chunk::whole::<W>(src, len) };
  if input.is_empty() || lut.is_null() {
    return;
  }
  // SAFETY: caller guarantees `dst` is writable for the whole-chunk span of
  // `src` and does not overlap it.
  let output = unsafe { chunk::whole_mut::<W>(dst, input.len()) };
  // SAFETY: caller guarantees 256 readable bytes at `lut`.
  let lut = unsafe { &*lut.cast::<Lut>() };
  for (o, i) in output.iter_mut().zip(input) {
    for (ob, &ib) in o.iter_mut().zip(i) {
      *ob = lut[ib as usize];
    }
  }
}

export_widths! {
  /// `1` if every whole-chunk byte has a non-zero LUT entry, else `0`.
  validate_u8_lut => lanecall_validate_u8_lut_16, lanecall_validate_u8_lut_32, lanecall_validate_u8_lut_64
  (ptr: *const u8, len: usize, lut: *const u8) -> u8
}

export_widths! {
  /// `dst[i] = lut[src[i]]` over whole chunks; the tail of `dst` is untouched.
  map_u8_lut => lanecall_map_u8_lut_16, lanecall_map_u8_lut_32, lanecall_map_u8_lut_64
  (src: *const u8, len: usize, dst: *mut u8, lut: *const u8)
}
