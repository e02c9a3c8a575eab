//! Low-overhead gateway to native vectorized byte kernels.
//!
//! Every operation picks a path by input length: below the op's threshold
//! an in-process scalar loop runs, at or above it the input goes through
//! the active backend to the `lanecall_*` kernels in whole lane-width
//! chunks, and the sub-lane tail finishes on the scalar loop.
//!
//! | Function | Result |
//! |----------|--------|
//! | [`sum_u8`] | byte sum, wrapping at 2^32 |
//! | [`is_ascii`] | every byte `< 0x80` |
//! | [`all_bytes_in_set`] | every byte has a non-zero [`LookupTable`] entry |
//! | [`map_bytes`] | `dst[i] = lut[src[i]]` |
//! | [`eq_u8_masks16`] / [`eq_u8_masks32`] / [`eq_u8_masks64`] | per-chunk equality bitmasks |
//! | [`crc32c`] / [`crc32c_update`] / [`crc32c_combine`] | CRC32-C (Castagnoli) |
//! | [`noop`] | empty kernel call, for measuring gateway overhead |
//!
//! # Example
//!
//! ```rust
//! let data = b"lanecall gateway";
//! assert_eq!(lanecall::sum_u8(&[1, 2, 3]), 6);
//! assert!(lanecall::is_ascii(data));
//!
//! let (a, b) = data.split_at(8);
//! let combined = lanecall::crc32c_combine(lanecall::crc32c(a), lanecall::crc32c(b), b.len());
//! assert_eq!(combined, lanecall::crc32c(data));
//! ```
//!
//! # Configuration
//!
//! Thresholds default to values tuned per backend strategy (see
//! [`config::TUNED_DEFAULTS`]). They are read once at first use and can be
//! overridden with `LANECALL_THRESHOLD_<OP>`; `LANECALL_FORCE=scalar|vector`
//! pins every op to one path.
//!
//! # Failure
//!
//! The first call initializes the backend. If that fails (for example the
//! dynamic-load build cannot find the kernels library) every call panics
//! with the cause. Call [`try_init`] at startup to handle it instead.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use std::sync::OnceLock;

use backend::{ActiveBackend, Backend, BackendError};

mod chunk;
pub mod config;
mod crc32c;
pub mod dispatch;
pub mod lut;
pub mod scalar;

pub use backend::{LookupTable, Strategy};
pub use chunk::{each16, each32, each64, each_chunk};
pub use config::{Config, Force, ThresholdOp, Thresholds};
pub use crc32c::Crc32c;
pub use dispatch::{Dispatcher, Path};
pub use lut::{ascii_set, byte_map, byte_set};

// ─────────────────────────────────────────────────────────────────────────────
// Active dispatcher
// ─────────────────────────────────────────────────────────────────────────────

static DISPATCHER: OnceLock<Dispatcher<'static, ActiveBackend>> = OnceLock::new();

/// Initialize the active backend and its configuration.
///
/// # Errors
///
/// The backend's initialization error, stored and returned on every call.
pub fn try_init() -> Result<&'static Dispatcher<'static, ActiveBackend>, &'static BackendError> {
  if let Some(d) = DISPATCHER.get() {
    return Ok(d);
  }
  let backend = backend::try_active()?;
  Ok(DISPATCHER.get_or_init(|| {
    let d = Dispatcher::new(backend);
    tracing::debug!(strategy = %backend.strategy(), thresholds = ?d.thresholds(), "lanecall dispatcher ready");
    d
  }))
}

/// The dispatcher over the active backend.
///
/// # Panics
///
/// If the backend failed to initialize.
#[must_use]
pub fn dispatcher() -> &'static Dispatcher<'static, ActiveBackend> {
  match try_init() {
    Ok(d) => d,
    Err(e) => panic!("lanecall backend unavailable: {e}"),
  }
}

/// Strategy of the active backend.
#[must_use]
pub fn strategy() -> Strategy {
  dispatcher().backend().strategy()
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Sum of all bytes, wrapping at 2^32.
#[inline]
#[must_use]
pub fn sum_u8(data: &[u8]) -> u32 {
  dispatcher().sum_u8(data)
}

/// `true` if every byte is below `0x80`. Empty input is ASCII.
#[inline]
#[must_use]
pub fn is_ascii(data: &[u8]) -> bool {
  dispatcher().is_ascii(data)
}

/// `true` if `lut[b] != 0` for every byte `b`. Empty input is in every set.
#[inline]
#[must_use]
pub fn all_bytes_in_set(data: &[u8], lut: &LookupTable) -> bool {
  dispatcher().all_bytes_in_set(data, lut)
}

/// Write `lut[src[i]]` into `dst[i]` for every `i < src.len()`; returns
/// `src.len()`. Bytes of `dst` past `src.len()` are untouched.
///
/// # Panics
///
/// If `dst` is shorter than `src`.
#[inline]
pub fn map_bytes(dst: &mut [u8], src: &[u8], lut: &LookupTable) -> usize {
  dispatcher().map_bytes(dst, src, lut)
}

/// One `u16` per whole 16-byte chunk of `src`, bit `i` set where byte `i`
/// equals `needle`. Returns the bytes processed (`src.len() / 16 * 16`);
/// the tail is the caller's.
///
/// # Panics
///
/// If `out` holds fewer than `src.len() / 16` words.
#[inline]
pub fn eq_u8_masks16(src: &[u8], needle: u8, out: &mut [u16]) -> usize {
  dispatcher().eq_u8_masks16(src, needle, out)
}

/// 32-byte chunk variant of [`eq_u8_masks16`].
#[inline]
pub fn eq_u8_masks32(src: &[u8], needle: u8, out: &mut [u32]) -> usize {
  dispatcher().eq_u8_masks32(src, needle, out)
}

/// 64-byte chunk variant of [`eq_u8_masks16`].
#[inline]
pub fn eq_u8_masks64(src: &[u8], needle: u8, out: &mut [u64]) -> usize {
  dispatcher().eq_u8_masks64(src, needle, out)
}

/// CRC32-C of `data`.
#[inline]
#[must_use]
pub fn crc32c(data: &[u8]) -> u32 {
  crc32c_update(0, data)
}

/// Extend the finalized CRC32-C `crc` with `data`.
#[inline]
#[must_use]
pub fn crc32c_update(crc: u32, data: &[u8]) -> u32 {
  dispatcher().crc32c_update(crc, data)
}

/// CRC32-C of `A || B` given `crc(A)`, `crc(B)` and `len(B)`.
///
/// Both digests must be CRC32-C; other polynomials give meaningless output.
#[inline]
#[must_use]
pub fn crc32c_combine(crc1: u32, crc2: u32, len2: usize) -> u32 {
  dispatcher().crc32c_combine(crc1, crc2, len2)
}

/// Call the empty kernel once through the active backend.
#[inline]
pub fn noop() {
  dispatcher().backend().noop();
}
