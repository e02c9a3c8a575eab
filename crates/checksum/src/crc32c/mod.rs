//! CRC32-C (Castagnoli) checksum.
//!
//! # Usage
//!
//! ```
//! use checksum::Crc32c;
//!
//! let crc = Crc32c::checksum(b"hello world");
//!
//! let mut hasher = Crc32c::new();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//! assert_eq!(hasher.finalize(), crc);
//! ```

pub(crate) mod portable;

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_64;

use traits::{Checksum, ChecksumCombine};

use crate::constants::crc32c::INIT;

// ─────────────────────────────────────────────────────────────────────────────
// Backend selection
// ─────────────────────────────────────────────────────────────────────────────

type ComputeFn = fn(u32, &[u8]) -> u32;

#[cfg(all(
  feature = "std",
  any(
    all(target_arch = "x86_64", not(target_feature = "sse4.2")),
    all(target_arch = "aarch64", not(target_feature = "crc"))
  )
))]
static SELECTED: std::sync::OnceLock<(ComputeFn, &'static str)> = std::sync::OnceLock::new();

/// Pick the fastest register-update function for this machine.
#[inline]
fn select() -> (ComputeFn, &'static str) {
  #[cfg(all(target_arch = "x86_64", target_feature = "sse4.2"))]
  {
    (x86_64::compute_sse42_enabled, "x86_64/sse4.2")
  }

  #[cfg(all(target_arch = "aarch64", target_feature = "crc"))]
  {
    (aarch64::compute_crc_enabled, "aarch64/crc")
  }

  #[cfg(all(feature = "std", target_arch = "x86_64", not(target_feature = "sse4.2")))]
  {
    *SELECTED.get_or_init(|| {
      if std::arch::is_x86_feature_detected!("sse4.2") {
        (x86_64::compute_sse42_runtime as ComputeFn, "x86_64/sse4.2")
      } else {
        (portable::compute as ComputeFn, "portable/slice8")
      }
    })
  }

  #[cfg(all(feature = "std", target_arch = "aarch64", not(target_feature = "crc")))]
  {
    *SELECTED.get_or_init(|| {
      if std::arch::is_aarch64_feature_detected!("crc") {
        (aarch64::compute_crc_runtime as ComputeFn, "aarch64/crc")
      } else {
        (portable::compute as ComputeFn, "portable/slice8")
      }
    })
  }

  #[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "sse4.2"),
    all(target_arch = "aarch64", target_feature = "crc"),
    all(feature = "std", any(target_arch = "x86_64", target_arch = "aarch64"))
  )))]
  {
    (portable::compute as ComputeFn, "portable/slice8")
  }
}

#[inline]
fn dispatch(crc: u32, data: &[u8]) -> u32 {
  if data.is_empty() {
    return crc;
  }
  (select().0)(crc, data)
}

/// Name of the CRC32-C implementation selected for this machine.
#[inline]
#[must_use]
pub fn selected_backend() -> &'static str {
  select().1
}

/// Extend a finalized CRC32-C digest with `data`.
///
/// `crc32c_update(crc32c(a), b) == crc32c(a || b)`, and `crc32c_update(0, b)`
/// is the plain digest of `b`.
#[inline]
#[must_use]
pub fn crc32c_update(crc: u32, data: &[u8]) -> u32 {
  dispatch(crc ^ INIT, data) ^ INIT
}

// ─────────────────────────────────────────────────────────────────────────────
// Crc32c
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming CRC32-C hasher.
///
/// `Crc32c` is `Send` and `Sync`; independent hashers can run in parallel
/// and be merged with [`combine`](Self::combine).
#[derive(Clone, Debug)]
pub struct Crc32c {
  /// Raw register (finalized value is `state ^ INIT`).
  state: u32,
  initial: u32,
}

impl Crc32c {
  /// Create a new hasher.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      state: INIT,
      initial: INIT,
    }
  }

  /// Create a hasher that continues from a finalized CRC.
  ///
  /// ```
  /// use checksum::Crc32c;
  ///
  /// let (first, second) = b"hello world".split_at(6);
  /// let mut hasher = Crc32c::resume(Crc32c::checksum(first));
  /// hasher.update(second);
  /// assert_eq!(hasher.finalize(), Crc32c::checksum(b"hello world"));
  /// ```
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self {
      state: crc ^ INIT,
      initial: crc ^ INIT,
    }
  }

  /// One-shot CRC32-C.
  ///
  /// ```
  /// use checksum::Crc32c;
  ///
  /// assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
  /// ```
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u32 {
    dispatch(INIT, data) ^ INIT
  }

  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.state = dispatch(self.state, data);
  }

  /// Current digest. Does not consume the hasher.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u32 {
    self.state ^ INIT
  }

  #[inline]
  pub fn reset(&mut self) {
    self.state = self.initial;
  }

  /// `crc(A || B)` from `crc(A)`, `crc(B)` and `len(B)` in O(log n).
  #[inline]
  #[must_use]
  pub fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    crate::combine::crc32c_combine(crc_a, crc_b, len_b)
  }
}

impl Default for Crc32c {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Checksum for Crc32c {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Crc32c::new()
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Crc32c::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Crc32c::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> u32 {
    Crc32c::finalize(self)
  }

  #[inline]
  fn reset(&mut self) {
    Crc32c::reset(self);
  }

  #[inline]
  fn checksum(data: &[u8]) -> u32 {
    Crc32c::checksum(data)
  }
}

impl ChecksumCombine for Crc32c {
  #[inline]
  fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    Crc32c::combine(crc_a, crc_b, len_b)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn golden_values() {
    assert_eq!(Crc32c::checksum(b""), 0);
    assert_eq!(Crc32c::checksum(b"hello"), 0x9A71_BB4C);
    assert_eq!(Crc32c::checksum(b"hello world"), 0xC994_65AA);
    assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
  }

  #[test]
  fn update_from_zero_is_checksum() {
    assert_eq!(crc32c_update(0, b"hello world"), 0xC994_65AA);
  }

  #[test]
  fn update_extends_digest() {
    let crc = crc32c_update(Crc32c::checksum(b"hello"), b" world");
    assert_eq!(crc, 0xC994_65AA);
  }

  #[test]
  fn update_with_empty_is_identity() {
    assert_eq!(crc32c_update(0xDEAD_BEEF, b""), 0xDEAD_BEEF);
  }

  #[test]
  fn selected_matches_portable() {
    let data: [u8; 1031] = core::array::from_fn(|i| (i as u8) ^ 0x5A);
    for len in [0usize, 1, 7, 8, 9, 63, 64, 65, 1024, 1031] {
      let input = &data[..len];
      assert_eq!(dispatch(INIT, input), portable::compute(INIT, input), "len {len}");
    }
  }

  #[test]
  fn reset_restores_initial() {
    let mut h = Crc32c::resume(0x1234_5678);
    h.update(b"garbage");
    h.reset();
    assert_eq!(h.finalize(), 0x1234_5678);
  }

  #[test]
  fn backend_name_is_known() {
    let name = selected_backend();
    assert!(
      ["x86_64/sse4.2", "aarch64/crc", "portable/slice8"].contains(&name),
      "unexpected backend {name}"
    );
  }
}
