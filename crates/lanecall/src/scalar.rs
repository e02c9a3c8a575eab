//! In-process scalar implementations.
//!
//! These are the below-threshold path, the tail finisher for the vector
//! path, and the reference every backend is tested against.

use backend::LookupTable;

/// Sum of all bytes modulo 2^32.
#[inline]
#[must_use]
pub fn sum_u8(data: &[u8]) -> u32 {
  data.iter().fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)))
}

#[inline]
#[must_use]
pub fn is_ascii(data: &[u8]) -> bool {
  data.iter().all(|&b| b < 0x80)
}

/// Every byte has a non-zero entry in `lut`.
#[inline]
#[must_use]
pub fn all_bytes_in_set(data: &[u8], lut: &LookupTable) -> bool {
  data.iter().all(|&b| lut.get(usize::from(b)).is_some_and(|&v| v != 0))
}

/// `dst[i] = lut[src[i]]` for every byte of `src`.
///
/// # Panics
/// If `dst` is shorter than `src`.
#[inline]
pub fn map_bytes(dst: &mut [u8], src: &[u8], lut: &LookupTable) -> usize {
  assert!(
    dst.len() >= src.len(),
    "map_bytes: destination holds {} bytes but source has {}",
    dst.len(),
    src.len()
  );
  for (d, &s) in dst.iter_mut().zip(src) {
    *d = lut.get(usize::from(s)).copied().unwrap_or_default();
  }
  src.len()
}

/// Extend a finalized CRC32-C digest.
#[inline]
#[must_use]
pub fn crc32c_update(crc: u32, data: &[u8]) -> u32 {
  checksum::crc32c_update(crc, data)
}

macro_rules! eq_masks {
  ($name:ident, $w:literal, $word:ty) => {
    #[doc = concat!("One `", stringify!($word), "` equality mask per whole ", stringify!($w), "-byte chunk.")]
    ///
    /// # Panics
    /// If `out` is too short for the whole chunks of `src`.
    pub fn $name(src: &[u8], needle: u8, out: &mut [$word]) -> usize {
      let (chunks, _) = src.as_chunks::<$w>();
      assert!(
        out.len() >= chunks.len(),
        concat!("eq_u8_masks", stringify!($w), ": output holds {} words but {} bytes need {}"),
        out.len(),
        src.len(),
        chunks.len()
      );
      for (word, chunk) in out.iter_mut().zip(chunks) {
        *word = chunk
          .iter()
          .enumerate()
          .fold(0, |m, (i, &b)| m | (<$word>::from(b == needle) << i));
      }
      chunks.len() * $w
    }
  };
}

eq_masks!(eq_u8_masks16, 16, u16);
eq_masks!(eq_u8_masks32, 32, u32);
eq_masks!(eq_u8_masks64, 64, u64);
