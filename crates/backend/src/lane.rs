//! Lane-width dispatch.
//!
//! Picks the widest lane width the buffer can fill and makes exactly one
//! kernel call on it. The kernel handles only whole chunks, so the result
//! reports how many bytes it covered; the caller owns the remainder.

use crate::{Backend, LaneWidth, LookupTable};

/// Widest entry of `widths` with `len >= width`.
#[inline]
#[must_use]
pub fn select_width(len: usize, widths: &[LaneWidth]) -> Option<LaneWidth> {
  widths.iter().copied().filter(|w| len >= w.bytes()).max()
}

/// Result of one lane-dispatched call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunked<T> {
  pub value: T,
  /// Bytes the kernel processed: `floor(len / width) * width`.
  pub consumed: usize,
  /// `None` when the input was empty and no call was made.
  pub width: Option<LaneWidth>,
}

impl<T> Chunked<T> {
  #[inline]
  const fn identity(value: T) -> Self {
    Self {
      value,
      consumed: 0,
      width: None,
    }
  }

  #[inline]
  const fn call(value: T, len: usize, width: LaneWidth) -> Self {
    Self {
      value,
      consumed: len / width.bytes() * width.bytes(),
      width: Some(width),
    }
  }
}

/// One-call dispatcher over a backend.
///
/// Each method returns `None` when no width fits (`0 < len < 16` by
/// default); the caller then runs its scalar path.
#[derive(Clone, Copy, Debug)]
pub struct LaneDispatcher<'b, B: ?Sized> {
  backend: &'b B,
  widths: &'b [LaneWidth],
}

impl<'b, B: Backend + ?Sized> LaneDispatcher<'b, B> {
  /// Dispatch over all widths.
  #[must_use]
  pub const fn new(backend: &'b B) -> Self {
    Self {
      backend,
      widths: &LaneWidth::DESCENDING,
    }
  }

  /// Dispatch over a subset of widths.
  #[must_use]
  pub const fn with_widths(backend: &'b B, widths: &'b [LaneWidth]) -> Self {
    Self { backend, widths }
  }

  #[inline]
  #[must_use]
  pub const fn backend(&self) -> &'b B {
    self.backend
  }

  #[inline]
  fn pick(&self, len: usize) -> Option<LaneWidth> {
    select_width(len, self.widths)
  }

  pub fn sum_u8(&self, data: &[u8]) -> Option<Chunked<u32>> {
    if data.is_empty() {
      return Some(Chunked::identity(0));
    }
    let w = self.pick(data.len())?;
    Some(Chunked::call(self.backend.sum_u8(w, data), data.len(), w))
  }

  pub fn is_ascii(&self, data: &[u8]) -> Option<Chunked<bool>> {
    if data.is_empty() {
      return Some(Chunked::identity(true));
    }
    let w = self.pick(data.len())?;
    Some(Chunked::call(self.backend.is_ascii(w, data), data.len(), w))
  }

  pub fn all_in_set(&self, data: &[u8], lut: &LookupTable) -> Option<Chunked<bool>> {
    if data.is_empty() {
      return Some(Chunked::identity(true));
    }
    let w = self.pick(data.len())?;
    Some(Chunked::call(self.backend.all_in_set(w, data, lut), data.len(), w))
  }

  /// # Panics
  /// If `dst` is shorter than `src`.
  pub fn map_bytes(&self, src: &[u8], dst: &mut [u8], lut: &LookupTable) -> Option<Chunked<()>> {
    if src.is_empty() {
      return Some(Chunked::identity(()));
    }
    let w = self.pick(src.len())?;
    self.backend.map_bytes(w, src, dst, lut);
    Some(Chunked::call((), src.len(), w))
  }

  pub fn crc32c_update(&self, init: u32, data: &[u8]) -> Option<Chunked<u32>> {
    if data.is_empty() {
      return Some(Chunked::identity(init));
    }
    let w = self.pick(data.len())?;
    Some(Chunked::call(self.backend.crc32c_update(w, init, data), data.len(), w))
  }

  /// Masks come per width because the output word type depends on it.
  pub fn eq_masks16(&self, src: &[u8], needle: u8, out: &mut [u16]) -> usize {
    self.backend.eq_masks16(src, needle, out)
  }

  pub fn eq_masks32(&self, src: &[u8], needle: u8, out: &mut [u32]) -> usize {
    self.backend.eq_masks32(src, needle, out)
  }

  pub fn eq_masks64(&self, src: &[u8], needle: u8, out: &mut [u64]) -> usize {
    self.backend.eq_masks64(src, needle, out)
  }
}
