//! Wrapping byte sum.

use crate::chunk::{self, export_widths};

#[inline(always)]
unsafe fn sum_u8<const W: usize>(ptr: *const u8, len: usize) -> u32 {
  // SAFETY: caller guarantees `ptr` is readable for `len` bytes.
  let chunks = unsafe { chunk::whole::<W>(ptr, len) };
  chunks.iter().fold(0u32, |acc, c| {
    let lane: u32 = c.iter().map(|&b| u32::from(b)).sum();
    acc.wrapping_add(lane)
  })
}

export_widths! {
  /// Sum of all bytes in whole chunks, modulo 2^32.
  sum_u8 => lanecall_sum_u8_16, lanecall_sum_u8_32, lanecall_sum_u8_64
  (ptr: *const u8, len: usize) -> u32
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ignores_partial_chunk() {
    let data: [u8; 40] = core::array::from_fn(|i| i as u8);
    let expected: u32 = (0..32u32).sum();
    // SAFETY: valid buffer.
    assert_eq!(unsafe { lanecall_sum_u8_32(data.as_ptr(), data.len()) }, expected);
    assert_eq!(unsafe { lanecall_sum_u8_64(data.as_ptr(), data.len()) }, 0);
  }

  #[test]
  fn empty_and_null() {
    // SAFETY: zero-length, never dereferenced.
    assert_eq!(unsafe { lanecall_sum_u8_16(core::ptr::null(), 0) }, 0);
  }

  #[test]
  fn all_widths_agree_on_multiples_of_64() {
    let data: [u8; 192] = core::array::from_fn(|i| (i as u8).wrapping_mul(13));
    let expected: u32 = data.iter().map(|&b| u32::from(b)).sum();
    // SAFETY: valid buffer.
    unsafe {
      assert_eq!(lanecall_sum_u8_16(data.as_ptr(), data.len()), expected);
      assert_eq!(lanecall_sum_u8_32(data.as_ptr(), data.len()), expected);
      assert_eq!(lanecall_sum_u8_64(data.as_ptr(), data.len()), expected);
    }
  }
}
