//! Raw-pointer to whole-chunk views.

/// View the whole `W`-byte chunks at `ptr`.
///
/// Returns an empty slice when `ptr` is null or `len < W`, so callers never
/// dereference memory for the identity case.
///
/// # Safety
/// When `len >= W` and `ptr` is non-null, `ptr` must be valid for reads of
/// `len` bytes for the returned lifetime.
#[inline(always)]
pub(crate) unsafe fn whole<'a, const W: usize>(ptr: *const u8, len: usize) -> &'a [[u8; W]] {
  let n = len / W;
  if ptr.is_null() || n == 0 {
    return &[];
  }
  // SAFETY: `[u8; W]` has alignment 1 and `n * W <= len` bytes are readable.
  unsafe { core::slice::from_raw_parts(ptr.cast::<[u8; W]>(), n) }
}

/// Mutable counterpart of [`whole`] with an explicit chunk count.
///
/// # Safety
/// When `n > 0` and `ptr` is non-null, `ptr` must be valid for writes of
/// `n * W` bytes and must not alias any live reference.
#[inline(always)]
pub(crate) unsafe fn whole_mut<'a, const W: usize>(ptr: *mut u8, n: usize) -> &'a mut [[u8; W]] {
  if ptr.is_null() || n == 0 {
    return &mut [];
  }
  // SAFETY: see function contract.
  unsafe { core::slice::from_raw_parts_mut(ptr.cast::<[u8; W]>(), n) }
}

/// Generate the `_16`, `_32`, `_64` exports of a const-generic kernel.
macro_rules! export_widths {
  (
    $(#[$meta:meta])*
    $generic:ident => $n16:ident, $n32:ident, $n64:ident
    ($($arg:ident : $ty:ty),*) $(-> $ret:ty)?
  ) => {
    $(#[$meta])*
    ///
    /// # Safety
    /// See the module documentation for pointer requirements.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn $n16($($arg: $ty),*) $(-> $ret)? {
      // SAFETY: forwarded caller contract.
      unsafe { $generic::<16>($($arg),*) }
    }

    $(#[$meta])*
    ///
    /// # Safety
    /// See the module documentation for pointer requirements.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn $n32($($arg: $ty),*) $(-> $ret)? {
      // SAFETY: forwarded caller contract.
      unsafe { $generic::<32>($($arg),*) }
    }

    $(#[$meta])*
    ///
    /// # Safety
    /// See the module documentation for pointer requirements.
    #[unsafe(no_mangle)]
    pub unsafe extern "C" fn $n64($($arg: $ty),*) $(-> $ret)? {
      // SAFETY: forwarded caller contract.
      unsafe { $generic::<64>($($arg),*) }
    }
  };
}

pub(crate) use export_widths;
