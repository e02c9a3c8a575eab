//! CRC32-C combination over GF(2).
//!
//! For a reflected CRC whose init value equals its final XOR:
//!
//! ```text
//! crc(A || B) = M^len(B) · crc(A)  XOR  crc(B)
//! ```
//!
//! where `M` is the linear operator that shifts one zero byte through the
//! register. `M^n` is built by square-and-multiply over the bits of `n`,
//! starting from the precomputed one-zero-byte and two-zero-bytes operators,
//! so the cost is O(log n) 32x32 matrix products.
//!
//! Only CRC32-C digests are valid inputs.

// SAFETY: All array indexing in this module uses bounded loop indices (0..32).
// Clippy cannot prove this in const fn contexts, but bounds are statically guaranteed.
#![allow(clippy::indexing_slicing)]

use crate::constants::crc32c::TABLE;

// ─────────────────────────────────────────────────────────────────────────────
// GF(2) 32x32 matrices
// ─────────────────────────────────────────────────────────────────────────────

/// A 32x32 matrix over GF(2).
///
/// Column `j` holds the image of register bit `j`; applying the matrix to a
/// register XORs together the columns of its set bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gf2Matrix32([u32; 32]);

impl Gf2Matrix32 {
  #[must_use]
  pub const fn identity() -> Self {
    let mut m = [0u32; 32];
    let mut i = 0;
    while i < 32 {
      m[i] = 1 << i;
      i += 1;
    }
    Self(m)
  }

  /// Build a matrix from its columns.
  #[inline]
  #[must_use]
  pub const fn from_columns(columns: [u32; 32]) -> Self {
    Self(columns)
  }

  #[inline]
  #[must_use]
  pub const fn columns(&self) -> &[u32; 32] {
    &self.0
  }

  /// Apply the matrix to a 32-bit register.
  #[inline]
  #[must_use]
  pub const fn mul_vec(&self, vec: u32) -> u32 {
    let mut result = 0u32;
    let mut bits = vec;
    let mut i = 0;
    while bits != 0 {
      if bits & 1 != 0 {
        result ^= self.0[i];
      }
      bits >>= 1;
      i += 1;
    }
    result
  }

  /// `self · other` (apply `other` first).
  #[must_use]
  pub const fn mul_mat(&self, other: &Self) -> Self {
    let mut result = [0u32; 32];
    let mut i = 0;
    while i < 32 {
      result[i] = self.mul_vec(other.0[i]);
      i += 1;
    }
    Self(result)
  }

  #[inline]
  #[must_use]
  pub const fn square(&self) -> Self {
    self.mul_mat(self)
  }
}

impl Default for Gf2Matrix32 {
  fn default() -> Self {
    Self::identity()
  }
}

/// Shift one zero byte through a CRC32-C register.
///
/// Low byte bits map through the byte table; the remaining bits move down
/// by eight positions.
const fn one_zero_byte() -> Gf2Matrix32 {
  let mut cols = [0u32; 32];
  let mut j = 0;
  while j < 32 {
    cols[j] = if j < 8 { TABLE[1 << j] } else { 1 << (j - 8) };
    j += 1;
  }
  Gf2Matrix32(cols)
}

/// Operator for one zero byte.
pub const ONE_ZERO_BYTE: Gf2Matrix32 = one_zero_byte();

/// Operator for two zero bytes (`ONE_ZERO_BYTE` squared).
pub const TWO_ZERO_BYTES: Gf2Matrix32 = ONE_ZERO_BYTE.square();

// ─────────────────────────────────────────────────────────────────────────────
// Combine
// ─────────────────────────────────────────────────────────────────────────────

/// Apply `len` zero bytes to `crc` in O(log len).
#[inline]
#[must_use]
pub fn shift_zero_bytes(crc: u32, len: usize) -> u32 {
  let mut crc = crc;
  let mut len = len as u64;

  if len & 1 != 0 {
    crc = ONE_ZERO_BYTE.mul_vec(crc);
  }
  len >>= 1;

  let mut op = TWO_ZERO_BYTES;
  while len != 0 {
    if len & 1 != 0 {
      crc = op.mul_vec(crc);
    }
    len >>= 1;
    if len == 0 {
      break;
    }
    op = op.square();
  }

  crc
}

/// Combine two CRC32-C digests.
///
/// Given `crc_a = crc32c(A)` and `crc_b = crc32c(B)`, returns `crc32c(A || B)`.
/// `len_b == 0` returns `crc_a` unchanged.
///
/// ```
/// use checksum::{Crc32c, crc32c_combine};
///
/// let a = Crc32c::checksum(b"hello ");
/// let b = Crc32c::checksum(b"world");
/// assert_eq!(crc32c_combine(a, b, 5), Crc32c::checksum(b"hello world"));
/// ```
#[inline]
#[must_use]
pub fn crc32c_combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
  if len_b == 0 {
    return crc_a;
  }
  shift_zero_bytes(crc_a, len_b) ^ crc_b
}
