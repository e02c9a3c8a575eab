//! Byte-equality bitmasks.
//!
//! One mask word per whole chunk: bit `i` is set when byte `i` of the chunk
//! equals the needle. Word type follows the lane width (`u16`, `u32`, `u64`).
//! `out` must have room for `len / w` words.

use crate::chunk;

#[inline(always)]
fn chunk_mask<const W: usize>(c: &[u8; W], needle: u8) -> u64 {
  c.iter()
    .enumerate()
    .fold(0u64, |m, (i, &b)| m | (u64::from(b == needle) << i))
}

/// Shared body of the exported mask kernels.
///
/// # Safety
/// `src` readable for `len` bytes; `out` writable for `len / W` words when
/// at least one whole chunk exists.
#[inline(always)]
unsafe fn write_masks<const W: usize, T>(
  src: *const u8,
  len: usize,
  needle: u8,
  out: *mut T,
  word: impl Fn(u64) -> T,
) -> usize {
  // SAFETY: caller guarantees `src` is readable for `len` bytes.
  let chunks = unsafe { chunk::whole::<W>(src, len) };
  if chunks.is_empty() {
    return 0;
  }
  debug_assert!(
    !out.is_null(),
    "eq_u8_masks{W}: null output for {} whole chunks",
    chunks.len()
  );
  if out.is_null() {
    return 0;
  }
  for (i, c) in chunks.iter().enumerate() {
    // SAFETY: `i < len / W` and caller guarantees that many words at `out`.
    unsafe { out.add(i).write_unaligned(word(chunk_mask(c, needle))) };
  }
  chunks.len() * W
}

macro_rules! eq_masks {
  ($name:ident, $w:literal, $word:ty) => {
    #[doc = concat!("Write one `", stringify!($word), "` equality mask per ", stringify!($w), "-byte chunk.")]
    ///
    /// Returns the number of bytes processed (`floor(len / w) * w`).
    ///
    /// # Safety
    /// `src` must be readable for `len` bytes and `out` writable for
    /// `len / w` words when at least one whole chunk exists.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn $name(src: *const u8, len: usize, needle: u8, out: *mut $word) -> usize {
      // SAFETY: forwarded caller contract.
      unsafe { write_masks::<$w, $word>(src, len, needle, out, |m| m as $word) }
    }
  };
}

eq_masks!(lanecall_eq_u8_masks_16, 16, u16);
eq_masks!(lanecall_eq_u8_masks_32, 32, u32);
eq_masks!(lanecall_eq_u8_masks_64, 64, u64);
