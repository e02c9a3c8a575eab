//! Direct-link backend: plain Rust calls to the kernels' `extern "C"` items.
//!
//! The linker resolves every symbol at build time, so this is the cheapest
//! crossing and the baseline the other strategies are measured against.

use lanecall_kernels as k;

use crate::{Backend, BackendError, EchoRecord, LaneWidth, LookupTable, ProbeArgs, Strategy};

/// Calls the statically linked kernels.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectBackend;

impl DirectBackend {
  /// Always succeeds; the kernels are part of the binary.
  ///
  /// # Errors
  ///
  /// Never. The signature matches the other strategies.
  pub fn init() -> Result<Self, BackendError> {
    tracing::debug!("direct backend linked");
    Ok(Self)
  }
}

// SAFETY: every method forwards its arguments unchanged to the matching kernel.
unsafe impl Backend for DirectBackend {
  #[inline]
  fn strategy(&self) -> Strategy {
    Strategy::DirectLink
  }

  #[inline]
  unsafe fn sum_u8_raw(&self, width: LaneWidth, ptr: *const u8, len: usize) -> u32 {
    let f = by_width!(width, k::lanecall_sum_u8_16, k::lanecall_sum_u8_32, k::lanecall_sum_u8_64);
    // SAFETY: forwarded caller contract.
    unsafe { f(ptr, len) }
  }

  #[inline]
  unsafe fn is_ascii_raw(&self, width: LaneWidth, ptr: *const u8, len: usize) -> bool {
    let f = by_width!(width, k::lanecall_is_ascii_16, k::lanecall_is_ascii_32, k::lanecall_is_ascii_64);
    // SAFETY: forwarded caller contract.
    unsafe { f(ptr, len) != 0 }
  }

  #[inline]
  unsafe fn all_in_set_raw(&self, width: LaneWidth, ptr: *const u8, len: usize, lut: &LookupTable) -> bool {
    let f = by_width!(
      width,
      k::lanecall_validate_u8_lut_16,
      k::lanecall_validate_u8_lut_32,
      k::lanecall_validate_u8_lut_64
    );
    // SAFETY: forwarded caller contract; `lut` is 256 bytes.
    unsafe { f(ptr, len, lut.as_ptr()) != 0 }
  }

  #[inline]
  unsafe fn map_bytes_raw(&self, width: LaneWidth, src: *const u8, len: usize, dst: *mut u8, lut: &LookupTable) {
    let f = by_width!(width, k::lanecall_map_u8_lut_16, k::lanecall_map_u8_lut_32, k::lanecall_map_u8_lut_64);
    // SAFETY: forwarded caller contract; `lut` is 256 bytes.
    unsafe { f(src, len, dst, lut.as_ptr()) }
  }

  #[inline]
  unsafe fn eq_masks16_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u16) -> usize {
    // SAFETY: forwarded caller contract.
    unsafe { k::lanecall_eq_u8_masks_16(src, len, needle, out) }
  }

  #[inline]
  unsafe fn eq_masks32_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u32) -> usize {
    // SAFETY: forwarded caller contract.
    unsafe { k::lanecall_eq_u8_masks_32(src, len, needle, out) }
  }

  #[inline]
  unsafe fn eq_masks64_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u64) -> usize {
    // SAFETY: forwarded caller contract.
    unsafe { k::lanecall_eq_u8_masks_64(src, len, needle, out) }
  }

  #[inline]
  unsafe fn crc32c_update_raw(&self, width: LaneWidth, ptr: *const u8, len: usize, init: u32) -> u32 {
    let f = by_width!(
      width,
      k::lanecall_crc32c_update_16,
      k::lanecall_crc32c_update_32,
      k::lanecall_crc32c_update_64
    );
    // SAFETY: forwarded caller contract.
    unsafe { f(ptr, len, init) }
  }

  #[inline]
  fn crc32c_combine(&self, crc1: u32, crc2: u32, len2: usize) -> u32 {
    k::lanecall_crc32c_combine(crc1, crc2, len2)
  }

  #[inline]
  fn noop(&self) {
    k::lanecall_noop();
  }

  #[inline]
  fn abi_probe(&self, a: ProbeArgs) -> u64 {
    k::lanecall_abi_probe(a.ptr as *const u8, a.len, a.v32, a.v8, a.v64, a.f64_bits, a.f32_bits)
  }

  #[inline]
  unsafe fn abi_echo_raw(&self, a: ProbeArgs, out: *mut EchoRecord) {
    // SAFETY: `EchoRecord` mirrors the kernel's `#[repr(C)]` record field
    // for field; caller guarantees `out` is writable.
    unsafe {
      k::lanecall_abi_echo(
        a.ptr as *const u8,
        a.len,
        a.v32,
        a.v8,
        a.v64,
        a.f64_bits,
        a.f32_bits,
        out.cast::<k::EchoRecord>(),
      );
    }
  }
}
