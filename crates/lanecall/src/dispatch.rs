//! Scalar/vector threshold dispatch and vector composition.
//!
//! Below an op's threshold the scalar loop runs in-process. At or above it,
//! the vector path repeatedly hands the unconsumed remainder to the lane
//! dispatcher (widest fitting width each time) and finishes the sub-lane
//! tail with the scalar loop. Partial results compose per op: wrapping add,
//! short-circuit AND, disjoint writes, CRC chaining.

use backend::{Backend, LaneDispatcher, LookupTable};

use crate::{
  config::{self, Config, Force, ThresholdOp, Thresholds},
  scalar,
};

/// Which side of the gateway runs an op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Path {
  Scalar,
  Vector,
}

/// Threshold dispatcher over one backend.
#[derive(Debug)]
pub struct Dispatcher<'b, B: ?Sized> {
  lanes: LaneDispatcher<'b, B>,
  thresholds: Thresholds,
  force: Force,
}

impl<'b, B: Backend + ?Sized> Dispatcher<'b, B> {
  /// Dispatcher using the effective configuration for the backend's strategy.
  #[must_use]
  pub fn new(backend: &'b B) -> Self {
    Self::with_config(backend, config::get(backend.strategy()))
  }

  #[must_use]
  pub fn with_config(backend: &'b B, config: Config) -> Self {
    Self {
      lanes: LaneDispatcher::new(backend),
      thresholds: config.thresholds,
      force: config.force,
    }
  }

  #[inline]
  #[must_use]
  pub fn backend(&self) -> &'b B {
    self.lanes.backend()
  }

  #[inline]
  #[must_use]
  pub const fn thresholds(&self) -> &Thresholds {
    &self.thresholds
  }

  /// `len < threshold` runs scalar, unless a path is forced.
  #[inline]
  #[must_use]
  pub fn path(&self, op: ThresholdOp, len: usize) -> Path {
    match self.force {
      Force::Scalar => Path::Scalar,
      Force::Vector => Path::Vector,
      Force::Auto if len < self.thresholds.get(op) => Path::Scalar,
      Force::Auto => Path::Vector,
    }
  }

  // ─────────────────────────────────────────────────────────────────────────
  // Operations
  // ─────────────────────────────────────────────────────────────────────────

  #[must_use]
  pub fn sum_u8(&self, data: &[u8]) -> u32 {
    match self.path(ThresholdOp::SumU8, data.len()) {
      Path::Scalar => scalar::sum_u8(data),
      Path::Vector => {
        let mut acc = 0u32;
        let mut rest = data;
        while let Some(c) = self.lanes.sum_u8(rest) {
          if c.consumed == 0 {
            break;
          }
          acc = acc.wrapping_add(c.value);
          rest = rest.get(c.consumed..).unwrap_or_default();
        }
        acc.wrapping_add(scalar::sum_u8(rest))
      }
    }
  }

  #[must_use]
  pub fn is_ascii(&self, data: &[u8]) -> bool {
    match self.path(ThresholdOp::IsAscii, data.len()) {
      Path::Scalar => scalar::is_ascii(data),
      Path::Vector => {
        let mut rest = data;
        while let Some(c) = self.lanes.is_ascii(rest) {
          if !c.value {
            return false;
          }
          if c.consumed == 0 {
            break;
          }
          rest = rest.get(c.consumed..).unwrap_or_default();
        }
        scalar::is_ascii(rest)
      }
    }
  }

  #[must_use]
  pub fn all_bytes_in_set(&self, data: &[u8], lut: &LookupTable) -> bool {
    match self.path(ThresholdOp::AllBytesInSet, data.len()) {
      Path::Scalar => scalar::all_bytes_in_set(data, lut),
      Path::Vector => {
        let mut rest = data;
        while let Some(c) = self.lanes.all_in_set(rest, lut) {
          if !c.value {
            return false;
          }
          if c.consumed == 0 {
            break;
          }
          rest = rest.get(c.consumed..).unwrap_or_default();
        }
        scalar::all_bytes_in_set(rest, lut)
      }
    }
  }

  /// Write `lut[src[i]]` to `dst[i]`; returns `src.len()`.
  ///
  /// # Panics
  /// If `dst` is shorter than `src`.
  pub fn map_bytes(&self, dst: &mut [u8], src: &[u8], lut: &LookupTable) -> usize {
    assert!(
      dst.len() >= src.len(),
      "map_bytes: destination holds {} bytes but source has {}",
      dst.len(),
      src.len()
    );
    let dst = &mut dst[..src.len()];
    match self.path(ThresholdOp::MapBytes, src.len()) {
      Path::Scalar => scalar::map_bytes(dst, src, lut),
      Path::Vector => {
        let mut done = 0;
        loop {
          let (Some(s), Some(d)) = (src.get(done..), dst.get_mut(done..)) else {
            break;
          };
          match self.lanes.map_bytes(s, d, lut) {
            Some(c) if c.consumed > 0 => done += c.consumed,
            _ => break,
          }
        }
        if let (Some(s), Some(d)) = (src.get(done..), dst.get_mut(done..)) {
          scalar::map_bytes(d, s, lut);
        }
        src.len()
      }
    }
  }

  /// Extend the finalized CRC32-C `crc` with `data`.
  #[must_use]
  pub fn crc32c_update(&self, crc: u32, data: &[u8]) -> u32 {
    match self.path(ThresholdOp::Crc32c, data.len()) {
      Path::Scalar => scalar::crc32c_update(crc, data),
      Path::Vector => {
        let mut crc = crc;
        let mut rest = data;
        while let Some(c) = self.lanes.crc32c_update(crc, rest) {
          if c.consumed == 0 {
            break;
          }
          crc = c.value;
          rest = rest.get(c.consumed..).unwrap_or_default();
        }
        scalar::crc32c_update(crc, rest)
      }
    }
  }

  #[inline]
  #[must_use]
  pub fn crc32c_combine(&self, crc1: u32, crc2: u32, len2: usize) -> u32 {
    self.backend().crc32c_combine(crc1, crc2, len2)
  }

  /// Whole 16-byte chunks only; see [`Backend::eq_masks16`].
  #[inline]
  pub fn eq_u8_masks16(&self, src: &[u8], needle: u8, out: &mut [u16]) -> usize {
    self.lanes.eq_masks16(src, needle, out)
  }

  #[inline]
  pub fn eq_u8_masks32(&self, src: &[u8], needle: u8, out: &mut [u32]) -> usize {
    self.lanes.eq_masks32(src, needle, out)
  }

  #[inline]
  pub fn eq_u8_masks64(&self, src: &[u8], needle: u8, out: &mut [u64]) -> usize {
    self.lanes.eq_masks64(src, needle, out)
  }
}

#[cfg(all(test, feature = "direct"))]
mod tests {
  use backend::{Strategy, direct::DirectBackend};

  use super::*;

  fn forced(force: Force) -> Dispatcher<'static, DirectBackend> {
    let config = Config {
      force,
      ..Config::tuned(Strategy::DirectLink)
    };
    Dispatcher::with_config(&DirectBackend, config)
  }

  #[test]
  fn threshold_boundary() {
    let d = Dispatcher::with_config(&DirectBackend, Config::tuned(Strategy::DirectLink));
    for op in ThresholdOp::ALL {
      let t = d.thresholds().get(op);
      assert_eq!(d.path(op, t - 1), Path::Scalar, "{op:?}");
      assert_eq!(d.path(op, t), Path::Vector, "{op:?}");
    }
  }

  #[test]
  fn force_overrides_length() {
    assert_eq!(forced(Force::Scalar).path(ThresholdOp::SumU8, 1 << 20), Path::Scalar);
    assert_eq!(forced(Force::Vector).path(ThresholdOp::SumU8, 0), Path::Vector);
  }

  #[test]
  fn vector_path_finishes_tail() {
    let d = forced(Force::Vector);
    let data: Vec<u8> = (0..=200u8).collect();
    assert_eq!(d.sum_u8(&data), scalar::sum_u8(&data));
    assert_eq!(d.sum_u8(&[1, 2, 3]), 6);
  }

  #[test]
  fn ascii_short_circuits_on_first_lane() {
    let d = forced(Force::Vector);
    let mut data = vec![b'a'; 1000];
    data[5] = 0xC3;
    assert!(!d.is_ascii(&data));
    data[5] = b'a';
    data[999] = 0xC3;
    assert!(!d.is_ascii(&data), "tail byte must be checked");
  }

  #[test]
  fn map_writes_exactly_src_len() {
    let d = forced(Force::Vector);
    let lut = crate::lut::byte_map(|b| b.wrapping_add(1));
    let src = [9u8; 70];
    let mut dst = [0u8; 80];
    assert_eq!(d.map_bytes(&mut dst, &src, &lut), 70);
    assert!(dst[..70].iter().all(|&b| b == 10));
    assert!(dst[70..].iter().all(|&b| b == 0));
  }
}
