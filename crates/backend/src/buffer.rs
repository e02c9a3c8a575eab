//! Buffer views handed to the raw backend calls.
//!
//! A view exposes a pointer only when the buffer is non-empty. An empty
//! slice's pointer is dangling and must never cross the gateway, so every
//! operation answers its identity for `None` without a native call.

use core::marker::PhantomData;

/// 256-entry byte lookup table.
pub type LookupTable = [u8; 256];

/// Read-only view of a slice for a native call.
#[derive(Clone, Copy, Debug)]
pub struct BufferView<'a, T> {
  ptr: *const T,
  len: usize,
  _borrow: PhantomData<&'a [T]>,
}

impl<'a, T> BufferView<'a, T> {
  #[inline]
  #[must_use]
  pub fn new(data: &'a [T]) -> Self {
    Self {
      ptr: data.as_ptr(),
      len: data.len(),
      _borrow: PhantomData,
    }
  }

  /// Pointer to the first element, `None` for an empty buffer.
  #[inline]
  #[must_use]
  pub fn ptr(&self) -> Option<*const T> {
    (self.len != 0).then_some(self.ptr)
  }

  #[inline]
  #[must_use]
  pub const fn len(&self) -> usize {
    self.len
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }
}

/// Writable view of a slice for a native call.
#[derive(Debug)]
pub struct BufferViewMut<'a, T> {
  ptr: *mut T,
  len: usize,
  _borrow: PhantomData<&'a mut [T]>,
}

impl<'a, T> BufferViewMut<'a, T> {
  #[inline]
  #[must_use]
  pub fn new(data: &'a mut [T]) -> Self {
    Self {
      ptr: data.as_mut_ptr(),
      len: data.len(),
      _borrow: PhantomData,
    }
  }

  #[inline]
  #[must_use]
  pub fn ptr(&mut self) -> Option<*mut T> {
    (self.len != 0).then_some(self.ptr)
  }

  #[inline]
  #[must_use]
  pub const fn len(&self) -> usize {
    self.len
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }
}
