//! Gateway probes: a no-op for latency and two ABI conformance kernels.
//!
//! The probe folds each argument, widened to `u64` in declaration order, into
//! an FNV-1a accumulator (one step per 64-bit word). The multiply after each
//! XOR makes the hash depend on argument order, so swapped registers or
//! stack slots change it:
//!
//! ```text
//! h = 0xcbf29ce484222325
//! h = (h ^ v) * 0x100000001b3   (wrapping, per argument)
//! ```
//!
//! Float arguments travel as raw bit patterns so the comparison is exact,
//! including NaN payloads and signed zeros.

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;

#[inline(always)]
const fn mix(h: u64, v: u64) -> u64 {
  (h ^ v).wrapping_mul(PRIME)
}

/// Does nothing. Measures the fixed cost of one gateway crossing.
#[unsafe(no_mangle)]
pub extern "C" fn lanecall_noop() {}

/// Hash of all seven arguments. The pointer is mixed as an address only.
#[unsafe(no_mangle)]
pub extern "C" fn lanecall_abi_probe(
  ptr: *const u8,
  len: usize,
  v32: u32,
  v8: u8,
  v64: u64,
  f64_bits: u64,
  f32_bits: u32,
) -> u64 {
  let mut h = OFFSET_BASIS;
  h = mix(h, ptr as usize as u64);
  h = mix(h, len as u64);
  h = mix(h, u64::from(v32));
  h = mix(h, u64::from(v8));
  h = mix(h, v64);
  h = mix(h, f64_bits);
  mix(h, u64::from(f32_bits))
}

/// Every probe argument as the native side received it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EchoRecord {
  pub ptr: usize,
  pub len: usize,
  pub v32: u32,
  pub v8: u8,
  pub v64: u64,
  pub f64_bits: u64,
  pub f32_bits: u32,
}

/// Write the received probe arguments into `*out`.
///
/// # Safety
/// `out` must be null or valid for a write of one [`EchoRecord`].
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn lanecall_abi_echo(
  ptr: *const u8,
  len: usize,
  v32: u32,
  v8: u8,
  v64: u64,
  f64_bits: u64,
  f32_bits: u32,
  out: *mut EchoRecord,
) {
  if out.is_null() {
    return;
  }
  let record = EchoRecord {
    ptr: ptr as usize,
    len,
    v32,
    v8,
    v64,
    f64_bits,
    f32_bits,
  };
  // SAFETY: caller guarantees `out` is writable.
  unsafe { out.write_unaligned(record) };
}
