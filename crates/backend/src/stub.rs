//! Precompiled backend: kernels reached through generated trampolines.
//!
//! The gateway's frame convention passes one pointer to an array of 64-bit
//! argument words. `build.rs` generates a naked trampoline per contract
//! entry (see [`stubgen`](crate::stubgen)) that unpacks the frame into the
//! platform's C convention and jumps to the linked kernel. Targets without
//! a generated set fail at [`StubBackend::init`].

use crate::{Backend, BackendError, EchoRecord, LaneWidth, LookupTable, ProbeArgs, Strategy};

#[cfg(lanecall_trampolines)]
mod trampolines {
  include!(concat!(env!("OUT_DIR"), "/trampolines.rs"));
}

#[cfg(lanecall_trampolines)]
use trampolines as t;

/// Calls the kernels through frame trampolines.
#[derive(Clone, Copy, Debug)]
pub struct StubBackend {
  _private: (),
}

impl StubBackend {
  /// # Errors
  ///
  /// [`BackendError::UnsupportedArch`] when no trampolines were generated
  /// for this target.
  pub fn init() -> Result<Self, BackendError> {
    if cfg!(lanecall_trampolines) {
      tracing::debug!(arch = std::env::consts::ARCH, "precompiled trampolines linked");
      Ok(Self { _private: () })
    } else {
      Err(BackendError::UnsupportedArch {
        arch: std::env::consts::ARCH,
        os: std::env::consts::OS,
      })
    }
  }
}

/// Argument words for one call, in contract order.
macro_rules! frame {
  ($($arg:expr),* $(,)?) => {
    [$($arg as u64),*]
  };
}

#[cfg(lanecall_trampolines)]
// SAFETY: every frame lists the call's arguments in contract order, widened
// to u64; the trampoline for the same contract entry unpacks it.
unsafe impl Backend for StubBackend {
  #[inline]
  fn strategy(&self) -> Strategy {
    Strategy::Precompiled
  }

  #[inline]
  unsafe fn sum_u8_raw(&self, width: LaneWidth, ptr: *const u8, len: usize) -> u32 {
    let frame = frame![ptr as usize, len];
    let f = by_width!(width, t::lanecall_sum_u8_16, t::lanecall_sum_u8_32, t::lanecall_sum_u8_64);
    // SAFETY: frame matches the contract; forwarded caller contract.
    unsafe { f(frame.as_ptr()) }
  }

  #[inline]
  unsafe fn is_ascii_raw(&self, width: LaneWidth, ptr: *const u8, len: usize) -> bool {
    let frame = frame![ptr as usize, len];
    let f = by_width!(width, t::lanecall_is_ascii_16, t::lanecall_is_ascii_32, t::lanecall_is_ascii_64);
    // SAFETY: frame matches the contract; forwarded caller contract.
    unsafe { f(frame.as_ptr()) != 0 }
  }

  #[inline]
  unsafe fn all_in_set_raw(&self, width: LaneWidth, ptr: *const u8, len: usize, lut: &LookupTable) -> bool {
    let frame = frame![ptr as usize, len, lut.as_ptr() as usize];
    let f = by_width!(
      width,
      t::lanecall_validate_u8_lut_16,
      t::lanecall_validate_u8_lut_32,
      t::lanecall_validate_u8_lut_64
    );
    // SAFETY: frame matches the contract; forwarded caller contract.
    unsafe { f(frame.as_ptr()) != 0 }
  }

  #[inline]
  unsafe fn map_bytes_raw(&self, width: LaneWidth, src: *const u8, len: usize, dst: *mut u8, lut: &LookupTable) {
    let frame = frame![src as usize, len, dst as usize, lut.as_ptr() as usize];
    let f = by_width!(width, t::lanecall_map_u8_lut_16, t::lanecall_map_u8_lut_32, t::lanecall_map_u8_lut_64);
    // SAFETY: frame matches the contract; forwarded caller contract.
    unsafe { f(frame.as_ptr()) }
  }

  #[inline]
  unsafe fn eq_masks16_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u16) -> usize {
    let frame = frame![src as usize, len, needle, out as usize];
    // SAFETY: frame matches the contract; forwarded caller contract.
    unsafe { t::lanecall_eq_u8_masks_16(frame.as_ptr()) }
  }

  #[inline]
  unsafe fn eq_masks32_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u32) -> usize {
    let frame = frame![src as usize, len, needle, out as usize];
    // SAFETY: frame matches the contract; forwarded caller contract.
    unsafe { t::lanecall_eq_u8_masks_32(frame.as_ptr()) }
  }

  #[inline]
  unsafe fn eq_masks64_raw(&self, src: *const u8, len: usize, needle: u8, out: *mut u64) -> usize {
    let frame = frame![src as usize, len, needle, out as usize];
    // SAFETY: frame matches the contract; forwarded caller contract.
    unsafe { t::lanecall_eq_u8_masks_64(frame.as_ptr()) }
  }

  #[inline]
  unsafe fn crc32c_update_raw(&self, width: LaneWidth, ptr: *const u8, len: usize, init: u32) -> u32 {
    let frame = frame![ptr as usize, len, init];
    let f = by_width!(
      width,
      t::lanecall_crc32c_update_16,
      t::lanecall_crc32c_update_32,
      t::lanecall_crc32c_update_64
    );
    // SAFETY: frame matches the contract; forwarded caller contract.
    unsafe { f(frame.as_ptr()) }
  }

  #[inline]
  fn crc32c_combine(&self, crc1: u32, crc2: u32, len2: usize) -> u32 {
    let frame = frame![crc1, crc2, len2];
    // SAFETY: frame matches the contract; no pointers.
    unsafe { t::lanecall_crc32c_combine(frame.as_ptr()) }
  }

  #[inline]
  fn noop(&self) {
    // SAFETY: the noop trampoline never reads its frame.
    unsafe { t::lanecall_noop(core::ptr::null()) }
  }

  #[inline]
  fn abi_probe(&self, a: ProbeArgs) -> u64 {
    let frame = frame![a.ptr, a.len, a.v32, a.v8, a.v64, a.f64_bits, a.f32_bits];
    // SAFETY: frame matches the contract; the pointer is not read.
    unsafe { t::lanecall_abi_probe(frame.as_ptr()) }
  }

  #[inline]
  unsafe fn abi_echo_raw(&self, a: ProbeArgs, out: *mut EchoRecord) {
    let frame = frame![a.ptr, a.len, a.v32, a.v8, a.v64, a.f64_bits, a.f32_bits, out as usize];
    // SAFETY: frame matches the contract; caller guarantees `out`.
    unsafe { t::lanecall_abi_echo(frame.as_ptr()) }
  }
}

/// Without trampolines the backend cannot be constructed; every method is
/// unreachable.
#[cfg(not(lanecall_trampolines))]
// SAFETY: `StubBackend::init` never succeeds on this target.
unsafe impl Backend for StubBackend {
  fn strategy(&self) -> Strategy {
    Strategy::Precompiled
  }
  unsafe fn sum_u8_raw(&self, _: LaneWidth, _: *const u8, _: usize) -> u32 {
    unreachable!()
  }
  unsafe fn is_ascii_raw(&self, _: LaneWidth, _: *const u8, _: usize) -> bool {
    unreachable!()
  }
  unsafe fn all_in_set_raw(&self, _: LaneWidth, _: *const u8, _: usize, _: &LookupTable) -> bool {
    unreachable!()
  }
  unsafe fn map_bytes_raw(&self, _: LaneWidth, _: *const u8, _: usize, _: *mut u8, _: &LookupTable) {
    unreachable!()
  }
  unsafe fn eq_masks16_raw(&self, _: *const u8, _: usize, _: u8, _: *mut u16) -> usize {
    unreachable!()
  }
  unsafe fn eq_masks32_raw(&self, _: *const u8, _: usize, _: u8, _: *mut u32) -> usize {
    unreachable!()
  }
  unsafe fn eq_masks64_raw(&self, _: *const u8, _: usize, _: u8, _: *mut u64) -> usize {
    unreachable!()
  }
  unsafe fn crc32c_update_raw(&self, _: LaneWidth, _: *const u8, _: usize, _: u32) -> u32 {
    unreachable!()
  }
  fn crc32c_combine(&self, _: u32, _: u32, _: usize) -> u32 {
    unreachable!()
  }
  fn noop(&self) {
    unreachable!()
  }
  fn abi_probe(&self, _: ProbeArgs) -> u64 {
    unreachable!()
  }
  unsafe fn abi_echo_raw(&self, _: ProbeArgs, _: *mut EchoRecord) {
    unreachable!()
  }
}

#[cfg(all(test, lanecall_trampolines))]
mod tests {
  use super::*;

  #[test]
  fn generated_file_is_current() {
    let abi = crate::stubgen::Abi::from_target(std::env::consts::ARCH, std::env::consts::OS).unwrap();
    let expected = crate::stubgen::generate(abi, "::lanecall_kernels", crate::CONTRACTS).unwrap();
    assert_eq!(include_str!(concat!(env!("OUT_DIR"), "/trampolines.rs")), expected);
  }

  #[test]
  fn frames_reach_kernels() {
    let b = StubBackend::init().unwrap();
    let data: Vec<u8> = (0..200u32).map(|i| i as u8).collect();
    let expected: u32 = data[..192].iter().map(|&v| u32::from(v)).sum();
    assert_eq!(b.sum_u8(LaneWidth::W64, &data), expected);
    assert!(!b.is_ascii(LaneWidth::W16, &data));
    assert!(b.is_ascii(LaneWidth::W16, &data[..128]));
  }

  #[test]
  fn spilled_arguments_survive() {
    let b = StubBackend::init().unwrap();
    crate::harness::certify(&b).unwrap();
  }

  #[test]
  fn u8_argument_is_not_sign_extended() {
    let b = StubBackend::init().unwrap();
    let mut data = [0u8; 32];
    data[3] = 0xFF;
    let mut out = [0u32; 1];
    assert_eq!(b.eq_masks32(&data, 0xFF, &mut out), 32);
    assert_eq!(out[0], 1 << 3);
  }
}
