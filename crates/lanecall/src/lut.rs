//! Lookup-table construction.

pub use backend::LookupTable;

/// Table with `1` for every byte in `members`, `0` elsewhere.
#[must_use]
pub fn byte_set(members: &[u8]) -> LookupTable {
  let mut lut = [0u8; 256];
  for &b in members {
    if let Some(slot) = lut.get_mut(usize::from(b)) {
      *slot = 1;
    }
  }
  lut
}

/// Membership table for `0x00..=0x7F`.
#[must_use]
pub const fn ascii_set() -> LookupTable {
  let mut lut = [0u8; 256];
  let mut i = 0;
  while i < 128 {
    lut[i] = 1;
    i += 1;
  }
  lut
}

/// Mapping table `lut[b] = f(b)`.
#[must_use]
pub fn byte_map(f: impl Fn(u8) -> u8) -> LookupTable {
  core::array::from_fn(|i| f(i as u8))
}
