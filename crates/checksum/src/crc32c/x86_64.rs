//! x86_64 CRC32-C via the SSE4.2 `crc32` instruction.

#![allow(unsafe_code)]

#[cfg(any(target_feature = "sse4.2", feature = "std"))]
use core::arch::x86_64::{_mm_crc32_u8, _mm_crc32_u64};

/// Advance a raw CRC register using SSE4.2.
///
/// # Safety
/// Caller must ensure the CPU supports the `sse4.2` target feature.
#[cfg(any(target_feature = "sse4.2", feature = "std"))]
#[target_feature(enable = "sse4.2")]
pub(crate) unsafe fn compute_sse42_unchecked(crc: u32, data: &[u8]) -> u32 {
  let mut current = u64::from(crc);
  let (words, tail) = data.as_chunks::<8>();

  for word in words {
    current = _mm_crc32_u64(current, u64::from_le_bytes(*word));
  }

  let mut current = current as u32;
  for &byte in tail {
    current = _mm_crc32_u8(current, byte);
  }

  current
}

/// SSE4.2 path when the feature is enabled at compile time.
#[cfg(target_feature = "sse4.2")]
#[inline]
pub fn compute_sse42_enabled(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only compiled when `target_feature = "sse4.2"`.
  unsafe { compute_sse42_unchecked(crc, data) }
}

#[cfg(all(feature = "std", not(target_feature = "sse4.2")))]
#[inline]
pub(crate) fn compute_sse42_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when `is_x86_feature_detected!("sse4.2")` is true.
  unsafe { compute_sse42_unchecked(crc, data) }
}
