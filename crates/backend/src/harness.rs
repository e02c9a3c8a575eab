//! ABI conformance harness.
//!
//! The probe kernel hashes its seven arguments natively with an
//! order-dependent FNV-1a fold; the harness hashes the same values on this
//! side of the gateway and compares. The echo kernel then returns every
//! argument as received, which is diffed field by field for every vector.
//! Truncation, sign extension, swapped registers or stack slots and
//! float-class mishandling each fail certification.

use core::fmt;

use crate::{Backend, Strategy};

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;

/// Arguments of one probe call.
///
/// `ptr` is an address only; the native side never dereferences it. Float
/// values travel as bit patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProbeArgs {
  pub ptr: usize,
  pub len: usize,
  pub v32: u32,
  pub v8: u8,
  pub v64: u64,
  pub f64_bits: u64,
  pub f32_bits: u32,
}

impl ProbeArgs {
  /// Each argument widened to `u64`, in declaration order.
  #[must_use]
  pub fn words(&self) -> [u64; 7] {
    [
      self.ptr as u64,
      self.len as u64,
      u64::from(self.v32),
      u64::from(self.v8),
      self.v64,
      self.f64_bits,
      u64::from(self.f32_bits),
    ]
  }
}

/// The probe arguments as the native side received them.
///
/// Layout mirrors the kernels' record.
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

impl From<ProbeArgs> for EchoRecord {
  fn from(a: ProbeArgs) -> Self {
    Self {
      ptr: a.ptr,
      len: a.len,
      v32: a.v32,
      v8: a.v8,
      v64: a.v64,
      f64_bits: a.f64_bits,
      f32_bits: a.f32_bits,
    }
  }
}

/// Hash the probe kernel must return for `args`.
#[must_use]
pub fn reference_hash(args: &ProbeArgs) -> u64 {
  args
    .words()
    .iter()
    .fold(OFFSET_BASIS, |h, &v| (h ^ v).wrapping_mul(PRIME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Vectors
// ─────────────────────────────────────────────────────────────────────────────

const F64_EDGES: [u64; 7] = [
  0,
  0x8000_0000_0000_0000, // -0.0
  0x7FF0_0000_0000_0000, // +inf
  0xFFF0_0000_0000_0000, // -inf
  0x7FF8_0000_0000_0000, // quiet NaN
  0x7FF0_0000_0000_0001, // signalling NaN
  0x3FF0_0000_0000_0000, // 1.0
];

const F32_EDGES: [u32; 7] = [
  0,
  0x8000_0000,
  0x7F80_0000,
  0xFF80_0000,
  0x7FC0_0000,
  0x7F80_0001,
  0x3F80_0000,
];

#[inline]
fn xorshift(x: &mut u64) -> u64 {
  *x ^= *x << 13;
  *x ^= *x >> 7;
  *x ^= *x << 17;
  *x
}

/// Deterministic probe vectors.
///
/// Cycles null/empty, null with a length, and arbitrary addresses; integer
/// extremes; and the float edge patterns of both widths. The remaining
/// entropy comes from a fixed xorshift stream.
#[must_use]
pub fn vectors(count: usize) -> Vec<ProbeArgs> {
  let mut x = 0x2545_F491_4F6C_DD1Du64;
  (0..count)
    .map(|i| {
      let r = xorshift(&mut x);
      let edge = i % F64_EDGES.len();
      let (ptr, len) = match i % 3 {
        0 => (0, 0),
        1 => (0, r as usize & 0xFFFF),
        _ => (r as usize & !7, (r >> 16) as usize),
      };
      let ints = i % 4 == 0;
      ProbeArgs {
        ptr,
        len,
        v32: if ints { u32::MAX } else { (r >> 8) as u32 },
        v8: if ints { u8::MAX } else { (r >> 40) as u8 },
        v64: if ints { u64::MAX } else { xorshift(&mut x) },
        f64_bits: F64_EDGES.get(edge).copied().unwrap_or(r),
        f32_bits: F32_EDGES.get(edge).copied().unwrap_or(r as u32),
      }
    })
    .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Certification
// ─────────────────────────────────────────────────────────────────────────────

/// One argument that crossed the gateway changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldMismatch {
  pub field: &'static str,
  pub sent: u64,
  pub received: u64,
}

/// A probe vector whose native hash disagreed with [`reference_hash`], or
/// whose echoed arguments differ from the ones sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiMismatch {
  pub strategy: Strategy,
  pub index: usize,
  pub args: ProbeArgs,
  pub expected: u64,
  pub actual: u64,
  /// Fields the echo kernel saw differently. Empty when the echo path
  /// agrees, which points at the return value rather than the arguments.
  pub fields: Vec<FieldMismatch>,
}

impl fmt::Display for AbiMismatch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} backend: probe vector {} hashed to {:#018x}, expected {:#018x}",
      self.strategy, self.index, self.actual, self.expected
    )?;
    if self.actual == self.expected {
      f.write_str(" as expected, but echoed arguments differ")?;
    } else if self.fields.is_empty() {
      return f.write_str(" (arguments echoed intact)");
    }
    for m in &self.fields {
      write!(f, "; {} sent {:#x} received {:#x}", m.field, m.sent, m.received)?;
    }
    Ok(())
  }
}

impl core::error::Error for AbiMismatch {}

/// Diff what was sent against what the echo kernel received.
#[must_use]
pub fn diff(args: &ProbeArgs, echoed: &EchoRecord) -> Vec<FieldMismatch> {
  const NAMES: [&str; 7] = ["ptr", "len", "v32", "v8", "v64", "f64_bits", "f32_bits"];
  let received = [
    echoed.ptr as u64,
    echoed.len as u64,
    u64::from(echoed.v32),
    u64::from(echoed.v8),
    echoed.v64,
    echoed.f64_bits,
    u64::from(echoed.f32_bits),
  ];
  NAMES
    .iter()
    .zip(args.words())
    .zip(received)
    .filter(|((_, sent), received)| sent != received)
    .map(|((&field, sent), received)| FieldMismatch { field, sent, received })
    .collect()
}

/// Default number of vectors [`certify`] runs.
pub const DEFAULT_VECTORS: usize = 1024;

/// Run [`DEFAULT_VECTORS`] probe vectors through `backend`.
///
/// # Errors
///
/// The first mismatching vector, with per-field echo diagnostics.
pub fn certify<B: Backend + ?Sized>(backend: &B) -> Result<usize, AbiMismatch> {
  certify_with(backend, &vectors(DEFAULT_VECTORS))
}

/// Run the given probe vectors through `backend`.
///
/// # Errors
///
/// The first mismatching vector, with per-field echo diagnostics.
pub fn certify_with<B: Backend + ?Sized>(backend: &B, vectors: &[ProbeArgs]) -> Result<usize, AbiMismatch> {
  for (index, args) in vectors.iter().enumerate() {
    let expected = reference_hash(args);
    let actual = backend.abi_probe(*args);
    let fields = diff(args, &backend.abi_echo(*args));
    if actual != expected || !fields.is_empty() {
      return Err(AbiMismatch {
        strategy: backend.strategy(),
        index,
        args: *args,
        expected,
        actual,
        fields,
      });
    }
  }
  Ok(vectors.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_args_hash() {
    let expected = (0..7).fold(OFFSET_BASIS, |h, _| h.wrapping_mul(PRIME));
    assert_eq!(reference_hash(&ProbeArgs::default()), expected);
  }

  #[test]
  fn hash_depends_on_argument_order() {
    let args = ProbeArgs {
      ptr: 0x1000,
      len: 64,
      v64: 3,
      f64_bits: 5,
      ..ProbeArgs::default()
    };
    let swapped_regs = ProbeArgs {
      ptr: args.len,
      len: args.ptr,
      ..args
    };
    let swapped_wide = ProbeArgs {
      v64: args.f64_bits,
      f64_bits: args.v64,
      ..args
    };
    assert_ne!(reference_hash(&args), reference_hash(&swapped_regs));
    assert_ne!(reference_hash(&args), reference_hash(&swapped_wide));
  }

  #[test]
  fn hash_sees_float_sign() {
    let pos = ProbeArgs::default();
    let neg = ProbeArgs {
      f64_bits: 0x8000_0000_0000_0000,
      ..pos
    };
    assert_ne!(reference_hash(&pos), reference_hash(&neg));
  }

  #[test]
  fn vectors_are_deterministic_and_cover_edges() {
    let v = vectors(64);
    assert_eq!(v, vectors(64));
    assert!(v.iter().any(|a| a.ptr == 0 && a.len == 0));
    assert!(v.iter().any(|a| a.v32 == u32::MAX && a.v8 == u8::MAX && a.v64 == u64::MAX));
    for edge in F64_EDGES {
      assert!(v.iter().any(|a| a.f64_bits == edge), "{edge:#x}");
    }
    for edge in F32_EDGES {
      assert!(v.iter().any(|a| a.f32_bits == edge), "{edge:#x}");
    }
  }

  #[test]
  fn diff_names_changed_fields() {
    let args = ProbeArgs {
      v8: 0xFF,
      v32: 7,
      ..ProbeArgs::default()
    };
    let mut echoed = EchoRecord::from(args);
    assert!(diff(&args, &echoed).is_empty());

    echoed.v8 = 0x7F;
    echoed.f32_bits = 1;
    let fields = diff(&args, &echoed);
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0], FieldMismatch { field: "v8", sent: 0xFF, received: 0x7F });
    assert_eq!(fields[1].field, "f32_bits");
  }

  #[test]
  fn mismatch_display() {
    let m = AbiMismatch {
      strategy: Strategy::DynamicLoad,
      index: 3,
      args: ProbeArgs::default(),
      expected: 1,
      actual: 2,
      fields: vec![FieldMismatch {
        field: "len",
        sent: 4,
        received: 0,
      }],
    };
    assert_eq!(
      m.to_string(),
      "dynamic backend: probe vector 3 hashed to 0x0000000000000002, expected 0x0000000000000001; len sent 0x4 received 0x0"
    );
  }

  #[test]
  fn echo_only_mismatch_display() {
    let m = AbiMismatch {
      strategy: Strategy::Precompiled,
      index: 0,
      args: ProbeArgs::default(),
      expected: 9,
      actual: 9,
      fields: vec![FieldMismatch {
        field: "v8",
        sent: 0xFF,
        received: 0x7F,
      }],
    };
    assert_eq!(
      m.to_string(),
      "precompiled backend: probe vector 0 hashed to 0x0000000000000009, expected 0x0000000000000009 as expected, \
       but echoed arguments differ; v8 sent 0xff received 0x7f"
    );
  }

  /// Forwards to the direct backend, but marshals the probe with `ptr`/`len`
  /// and `v64`/`f64_bits` exchanged.
  #[cfg(feature = "direct")]
  struct SwappingBackend;

  #[cfg(feature = "direct")]
  impl SwappingBackend {
    fn swap(a: ProbeArgs) -> ProbeArgs {
      ProbeArgs {
        ptr: a.len,
        len: a.ptr,
        v64: a.f64_bits,
        f64_bits: a.v64,
        ..a
      }
    }
  }

  #[cfg(feature = "direct")]
  // SAFETY: test double; every raw call forwards unchanged except the probes.
  unsafe impl Backend for SwappingBackend {
    fn strategy(&self) -> Strategy {
      Strategy::DirectLink
    }
    unsafe fn sum_u8_raw(&self, w: crate::LaneWidth, p: *const u8, n: usize) -> u32 {
      unsafe { crate::direct::DirectBackend.sum_u8_raw(w, p, n) }
    }
    unsafe fn is_ascii_raw(&self, w: crate::LaneWidth, p: *const u8, n: usize) -> bool {
      unsafe { crate::direct::DirectBackend.is_ascii_raw(w, p, n) }
    }
    unsafe fn all_in_set_raw(&self, w: crate::LaneWidth, p: *const u8, n: usize, lut: &crate::LookupTable) -> bool {
      unsafe { crate::direct::DirectBackend.all_in_set_raw(w, p, n, lut) }
    }
    unsafe fn map_bytes_raw(&self, w: crate::LaneWidth, s: *const u8, n: usize, d: *mut u8, lut: &crate::LookupTable) {
      unsafe { crate::direct::DirectBackend.map_bytes_raw(w, s, n, d, lut) }
    }
    unsafe fn eq_masks16_raw(&self, s: *const u8, n: usize, needle: u8, o: *mut u16) -> usize {
      unsafe { crate::direct::DirectBackend.eq_masks16_raw(s, n, needle, o) }
    }
    unsafe fn eq_masks32_raw(&self, s: *const u8, n: usize, needle: u8, o: *mut u32) -> usize {
      unsafe { crate::direct::DirectBackend.eq_masks32_raw(s, n, needle, o) }
    }
    unsafe fn eq_masks64_raw(&self, s: *const u8, n: usize, needle: u8, o: *mut u64) -> usize {
      unsafe { crate::direct::DirectBackend.eq_masks64_raw(s, n, needle, o) }
    }
    unsafe fn crc32c_update_raw(&self, w: crate::LaneWidth, p: *const u8, n: usize, init: u32) -> u32 {
      unsafe { crate::direct::DirectBackend.crc32c_update_raw(w, p, n, init) }
    }
    fn crc32c_combine(&self, a: u32, b: u32, n: usize) -> u32 {
      crate::direct::DirectBackend.crc32c_combine(a, b, n)
    }
    fn noop(&self) {}
    fn abi_probe(&self, args: ProbeArgs) -> u64 {
      crate::direct::DirectBackend.abi_probe(Self::swap(args))
    }
    unsafe fn abi_echo_raw(&self, args: ProbeArgs, out: *mut EchoRecord) {
      unsafe { crate::direct::DirectBackend.abi_echo_raw(Self::swap(args), out) }
    }
  }

  #[cfg(feature = "direct")]
  #[test]
  fn swapped_arguments_fail_certification() {
    let err = certify(&SwappingBackend).unwrap_err();
    assert_eq!(err.index, 0);
    assert_ne!(err.actual, err.expected);
    let names: Vec<_> = err.fields.iter().map(|m| m.field).collect();
    assert_eq!(names, ["v64", "f64_bits"], "vector 0 has a null, empty buffer");
  }

  #[cfg(feature = "direct")]
  #[test]
  fn direct_backend_certifies() {
    assert_eq!(certify(&crate::direct::DirectBackend), Ok(DEFAULT_VECTORS));
  }
}
