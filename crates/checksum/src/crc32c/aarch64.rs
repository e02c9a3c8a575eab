//! aarch64 CRC32-C via the ARMv8 CRC extension.

#![allow(unsafe_code)]

#[cfg(any(target_feature = "crc", feature = "std"))]
use core::arch::aarch64::{__crc32cb, __crc32cd};

/// Advance a raw CRC register using the `crc32c*` instructions.
///
/// # Safety
/// Caller must ensure the CPU supports the `crc` target feature.
#[cfg(any(target_feature = "crc", feature = "std"))]
#[target_feature(enable = "crc")]
pub(crate) unsafe fn compute_crc_unchecked(crc: u32, data: &[u8]) -> u32 {
  let mut current = crc;
  let (words, tail) = data.as_chunks::<8>();

  for word in words {
    current = __crc32cd(current, u64::from_le_bytes(*word));
  }
  for &byte in tail {
    current = __crc32cb(current, byte);
  }

  current
}

#[cfg(target_feature = "crc")]
#[inline]
pub fn compute_crc_enabled(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only compiled when `target_feature = "crc"`.
  unsafe { compute_crc_unchecked(crc, data) }
}

#[cfg(all(feature = "std", not(target_feature = "crc")))]
#[inline]
pub(crate) fn compute_crc_runtime(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: selected only when `is_aarch64_feature_detected!("crc")` is true.
  unsafe { compute_crc_unchecked(crc, data) }
}
