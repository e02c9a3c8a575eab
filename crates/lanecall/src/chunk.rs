//! Fixed-width chunk iteration for callers managing their own remainder.

/// Call `f` on each whole `W`-byte chunk of `data`; return the tail.
///
/// ```
/// let mut n = 0;
/// let tail = lanecall::each_chunk::<16>(&[0u8; 40], |_| n += 1);
/// assert_eq!((n, tail.len()), (2, 8));
/// ```
#[inline]
pub fn each_chunk<const W: usize>(data: &[u8], mut f: impl FnMut(&[u8; W])) -> &[u8] {
  let (chunks, tail) = data.as_chunks::<W>();
  for chunk in chunks {
    f(chunk);
  }
  tail
}

#[inline]
pub fn each16(data: &[u8], f: impl FnMut(&[u8; 16])) -> &[u8] {
  each_chunk::<16>(data, f)
}

#[inline]
pub fn each32(data: &[u8], f: impl FnMut(&[u8; 32])) -> &[u8] {
  each_chunk::<32>(data, f)
}

#[inline]
pub fn each64(data: &[u8], f: impl FnMut(&[u8; 64])) -> &[u8] {
  each_chunk::<64>(data, f)
}
