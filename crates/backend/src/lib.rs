//! Native-call backends for the lanecall gateway.
//!
//! A [`Backend`] moves arguments from safe Rust slices to the `lanecall_*`
//! kernels and back. Three strategies implement the same contract:
//!
//! | Strategy | Feature | Mechanism |
//! |----------|---------|-----------|
//! | [`Strategy::DirectLink`] | `direct` | ordinary calls into the linked kernels |
//! | [`Strategy::DynamicLoad`] | `dynamic` | `dlopen` + resolved address table |
//! | [`Strategy::Precompiled`] | `stub` | generated frame trampolines |
//!
//! Exactly one is *active* per build, by feature priority
//! `direct` > `stub` > `dynamic`. [`active`] initializes it once; the other
//! compiled-in strategies stay reachable through their modules for
//! benchmarking and the ABI harness.
//!
//! # Layers
//!
//! - [`contract`]: symbol table shared with `build.rs`
//! - [`lane`]: one kernel call on the widest lane width that fits
//! - [`harness`]: ABI conformance probes
//! - [`stubgen`]: trampoline source generator

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

#[cfg(not(any(feature = "direct", feature = "dynamic", feature = "stub")))]
compile_error!("enable at least one of the `direct`, `dynamic` or `stub` features");

use std::sync::OnceLock;

/// Picks the `_16`/`_32`/`_64` member of a kernel family.
#[allow(unused_macros)]
macro_rules! by_width {
  ($width:expr, $f16:path, $f32:path, $f64:path) => {
    match $width {
      $crate::LaneWidth::W16 => $f16,
      $crate::LaneWidth::W32 => $f32,
      $crate::LaneWidth::W64 => $f64,
    }
  };
}

pub mod buffer;
pub mod contract;
pub mod error;
pub mod harness;
pub mod lane;
pub mod stubgen;

#[cfg(feature = "direct")]
pub mod direct;
#[cfg(feature = "dynamic")]
pub mod dynamic;
#[cfg(feature = "stub")]
pub mod stub;

pub use buffer::{BufferView, BufferViewMut, LookupTable};
pub use contract::{CONTRACTS, KernelContract, KernelId, LaneWidth};
pub use error::BackendError;
pub use harness::{EchoRecord, ProbeArgs};
pub use lane::{Chunked, LaneDispatcher, select_width};

// ─────────────────────────────────────────────────────────────────────────────
// Strategy
// ─────────────────────────────────────────────────────────────────────────────

/// How a backend reaches the native kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
  DirectLink,
  DynamicLoad,
  Precompiled,
}

impl Strategy {
  pub const ALL: [Strategy; 3] = [Strategy::DirectLink, Strategy::DynamicLoad, Strategy::Precompiled];

  #[inline]
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Strategy::DirectLink => "direct",
      Strategy::DynamicLoad => "dynamic",
      Strategy::Precompiled => "precompiled",
    }
  }
}

impl core::fmt::Display for Strategy {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Marshals calls into the kernel contract.
///
/// The `*_raw` methods mirror the kernels one-to-one and follow the
/// whole-chunk rule: only `floor(len / w) * w` bytes are processed. The
/// provided slice methods route buffers through [`BufferView`] so an empty
/// buffer answers its identity without a native call.
///
/// # Safety
///
/// Implementors must pass every argument to the kernel named by
/// [`KernelId::lane`] for `(op, width)` bit-for-bit and return its result
/// unchanged. The ABI harness checks this.
pub unsafe trait Backend: Send + Sync + 'static {
  fn strategy(&self) -> Strategy;

  /// # Safety
  /// `ptr` must be readable for `len` bytes.
  unsafe fn sum_u8_raw(&self, width: LaneWidth, ptr: *const u8, len: usize) -> u32;

  /// # Safety
  /// `ptr` must be readable for `len` bytes.
  unsafe fn is_ascii_raw(&self, width: LaneWidth, ptr: *const u8, len: usize) -> bool;

  /// # Safety
  /// `ptr` must be readable for `len` bytes.
  unsafe fn all_in_set_raw(&self, width: LaneWidth, ptr: *const u8, len: usize, lut: &LookupTable) -> bool;

  /// # Safety
  /// `src` readable for `len` bytes, `dst` writable for the whole-chunk
  /// span of `len`, no overlap.
  unsafe fn map_bytes_raw(&self, width: LaneWidth, src: *const u8, len: usize, dst: *mut u8, lut: &LookupTable);

  /// # Safety
  /// `src` readable for `len` bytes, `out` writable for `len / 16` words.
  unsafe fn eq_masks16_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u16) -> usize;

  /// # Safety
  /// `src` readable for `len` bytes, `out` writable for `len / 32` words.
  unsafe fn eq_masks32_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u32) -> usize;

  /// # Safety
  /// `src` readable for `len` bytes, `out` writable for `len / 64` words.
  unsafe fn eq_masks64_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u64) -> usize;

  /// # Safety
  /// `ptr` must be readable for `len` bytes.
  unsafe fn crc32c_update_raw(&self, width: LaneWidth, ptr: *const u8, len: usize, init: u32) -> u32;

  fn crc32c_combine(&self, crc1: u32, crc2: u32, len2: usize) -> u32;

  /// One gateway crossing with no work.
  fn noop(&self);

  /// Native mix hash of the probe arguments. The pointer is never read.
  fn abi_probe(&self, args: ProbeArgs) -> u64;

  /// # Safety
  /// `out` must be writable for one [`EchoRecord`].
  unsafe fn abi_echo_raw(&self, args: ProbeArgs, out: *mut EchoRecord);

  // ───────────────────────────────────────────────────────────────────────
  // Safe entry points
  // ───────────────────────────────────────────────────────────────────────

  #[inline]
  fn sum_u8(&self, width: LaneWidth, data: &[u8]) -> u32 {
    let view = BufferView::new(data);
    match view.ptr() {
      // SAFETY: the view borrows `data` for this call.
      Some(ptr) => unsafe { self.sum_u8_raw(width, ptr, view.len()) },
      None => 0,
    }
  }

  #[inline]
  fn is_ascii(&self, width: LaneWidth, data: &[u8]) -> bool {
    let view = BufferView::new(data);
    match view.ptr() {
      // SAFETY: the view borrows `data` for this call.
      Some(ptr) => unsafe { self.is_ascii_raw(width, ptr, view.len()) },
      None => true,
    }
  }

  #[inline]
  fn all_in_set(&self, width: LaneWidth, data: &[u8], lut: &LookupTable) -> bool {
    let view = BufferView::new(data);
    match view.ptr() {
      // SAFETY: the view borrows `data` for this call.
      Some(ptr) => unsafe { self.all_in_set_raw(width, ptr, view.len(), lut) },
      None => true,
    }
  }

  /// Map whole chunks of `src` into `dst`.
  ///
  /// # Panics
  /// If `dst` is shorter than `src`.
  #[inline]
  fn map_bytes(&self, width: LaneWidth, src: &[u8], dst: &mut [u8], lut: &LookupTable) {
    assert!(
      dst.len() >= src.len(),
      "map_bytes: destination holds {} bytes but source has {}",
      dst.len(),
      src.len()
    );
    let input = BufferView::new(src);
    let mut output = BufferViewMut::new(dst);
    if let (Some(s), Some(d)) = (input.ptr(), output.ptr()) {
      // SAFETY: `dst` is at least as long as `src`; `&mut` excludes overlap.
      unsafe { self.map_bytes_raw(width, s, input.len(), d, lut) }
    }
  }

  /// # Panics
  /// If `out` holds fewer than `src.len() / 16` words.
  #[inline]
  fn eq_masks16(&self, src: &[u8], needle: u8, out: &mut [u16]) -> usize {
    check_mask_room(src.len(), 16, out.len());
    let input = BufferView::new(src);
    let mut output = BufferViewMut::new(out);
    match (input.ptr(), output.ptr()) {
      // SAFETY: room checked above.
      (Some(s), Some(o)) => unsafe { self.eq_masks16_raw(s, input.len(), needle, o) },
      _ => 0,
    }
  }

  /// # Panics
  /// If `out` holds fewer than `src.len() / 32` words.
  #[inline]
  fn eq_masks32(&self, src: &[u8], needle: u8, out: &mut [u32]) -> usize {
    check_mask_room(src.len(), 32, out.len());
    let input = BufferView::new(src);
    let mut output = BufferViewMut::new(out);
    match (input.ptr(), output.ptr()) {
      // SAFETY: room checked above.
      (Some(s), Some(o)) => unsafe { self.eq_masks32_raw(s, input.len(), needle, o) },
      _ => 0,
    }
  }

  /// # Panics
  /// If `out` holds fewer than `src.len() / 64` words.
  #[inline]
  fn eq_masks64(&self, src: &[u8], needle: u8, out: &mut [u64]) -> usize {
    check_mask_room(src.len(), 64, out.len());
    let input = BufferView::new(src);
    let mut output = BufferViewMut::new(out);
    match (input.ptr(), output.ptr()) {
      // SAFETY: room checked above.
      (Some(s), Some(o)) => unsafe { self.eq_masks64_raw(s, input.len(), needle, o) },
      _ => 0,
    }
  }

  /// Extend the finalized CRC32-C `init` with the whole chunks of `data`.
  #[inline]
  fn crc32c_update(&self, width: LaneWidth, init: u32, data: &[u8]) -> u32 {
    let view = BufferView::new(data);
    match view.ptr() {
      // SAFETY: the view borrows `data` for this call.
      Some(ptr) => unsafe { self.crc32c_update_raw(width, ptr, view.len(), init) },
      None => init,
    }
  }

  /// Arguments as the native side received them.
  #[inline]
  fn abi_echo(&self, args: ProbeArgs) -> EchoRecord {
    let mut record = EchoRecord::default();
    // SAFETY: `record` is a live local.
    unsafe { self.abi_echo_raw(args, &mut record) };
    record
  }
}

#[inline]
#[track_caller]
fn check_mask_room(len: usize, width: usize, words: usize) {
  let need = len / width;
  assert!(
    words >= need,
    "eq_u8_masks{width}: output holds {words} words but {len} bytes need {need}"
  );
}

// ─────────────────────────────────────────────────────────────────────────────
// Active backend
// ─────────────────────────────────────────────────────────────────────────────

/// The strategy selected by cargo features.
#[cfg(feature = "direct")]
pub type ActiveBackend = direct::DirectBackend;
#[cfg(all(feature = "stub", not(feature = "direct")))]
pub type ActiveBackend = stub::StubBackend;
#[cfg(all(feature = "dynamic", not(any(feature = "direct", feature = "stub"))))]
pub type ActiveBackend = dynamic::DynamicBackend;

static ACTIVE: OnceLock<Result<ActiveBackend, BackendError>> = OnceLock::new();

/// Initialize (once) and return the active backend.
///
/// Concurrent first callers block until initialization finishes. A failure
/// is stored and returned to every caller.
///
/// # Errors
///
/// The [`BackendError`] from the first initialization attempt.
pub fn try_active() -> Result<&'static ActiveBackend, &'static BackendError> {
  ACTIVE
    .get_or_init(|| {
      let result = ActiveBackend::init();
      match &result {
        Ok(backend) => tracing::info!(strategy = %backend.strategy(), "lanecall backend ready"),
        Err(e) => tracing::error!(error = %e, "lanecall backend failed to initialize"),
      }
      result
    })
    .as_ref()
}

/// The active backend.
///
/// # Panics
///
/// If initialization failed. Binaries that want their own message call
/// [`try_active`] at startup.
#[must_use]
pub fn active() -> &'static ActiveBackend {
  match try_active() {
    Ok(backend) => backend,
    Err(e) => panic!("lanecall backend unavailable: {e}"),
  }
}
