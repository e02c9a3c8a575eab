//! Property tests for CRC32-C.
//!
//! 1. **Combine correctness**: `crc(A || B) == combine(crc(A), crc(B), len(B))`
//!    checked against the bitwise reference.
//! 2. **Chunking equivalence**: any sequence of `update` calls equals one-shot.
//! 3. **Update law**: `crc32c_update(crc(A), B) == crc(A || B)`.

#![cfg(not(miri))]

extern crate std;

use std::vec::Vec;

use proptest::prelude::*;
use traits::{Checksum, ChecksumCombine};

use crate::{Crc32c, crc32c_update, reference};

proptest! {
  #![proptest_config(ProptestConfig::with_cases(256))]

  #[test]
  fn combine_correctness(
    data in proptest::collection::vec(any::<u8>(), 0..=4096),
    split in any::<usize>()
  ) {
    let split = split % (data.len() + 1);
    let (a, b) = data.split_at(split);

    let combined = <Crc32c as ChecksumCombine>::combine(Crc32c::checksum(a), Crc32c::checksum(b), b.len());
    let expected = reference::crc32c(&data);

    prop_assert_eq!(combined, expected,
      "combine(crc(A), crc(B), len(B)) != crc(A||B) at split {}/{}", split, data.len());
  }

  #[test]
  fn combine_three_way(
    a in proptest::collection::vec(any::<u8>(), 0..=512),
    b in proptest::collection::vec(any::<u8>(), 0..=512),
    c in proptest::collection::vec(any::<u8>(), 0..=512)
  ) {
    let ab = Crc32c::combine(Crc32c::checksum(&a), Crc32c::checksum(&b), b.len());
    let abc = Crc32c::combine(ab, Crc32c::checksum(&c), c.len());

    let whole: Vec<u8> = a.iter().chain(&b).chain(&c).copied().collect();
    prop_assert_eq!(abc, Crc32c::checksum(&whole));
  }

  #[test]
  fn chunking_equivalence(
    data in proptest::collection::vec(any::<u8>(), 0..=4096),
    chunk_sizes in proptest::collection::vec(1usize..=257, 1..=32)
  ) {
    let mut hasher = <Crc32c as Checksum>::new();
    let mut rest = data.as_slice();
    let mut sizes = chunk_sizes.iter().cycle();
    while !rest.is_empty() {
      let size = sizes.next().copied().unwrap_or(1).min(rest.len());
      let (head, tail) = rest.split_at(size);
      hasher.update(head);
      rest = tail;
    }

    prop_assert_eq!(hasher.finalize(), Crc32c::checksum(&data));
  }

  #[test]
  fn update_law(
    a in proptest::collection::vec(any::<u8>(), 0..=1024),
    b in proptest::collection::vec(any::<u8>(), 0..=1024)
  ) {
    let whole: Vec<u8> = a.iter().chain(&b).copied().collect();
    prop_assert_eq!(crc32c_update(Crc32c::checksum(&a), &b), Crc32c::checksum(&whole));
  }

  #[test]
  fn vectored_matches_oneshot(
    parts in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..=64), 0..=8)
  ) {
    let bufs: Vec<&[u8]> = parts.iter().map(Vec::as_slice).collect();
    let mut hasher = Crc32c::new();
    Checksum::update_vectored(&mut hasher, &bufs);

    let whole: Vec<u8> = parts.concat();
    prop_assert_eq!(hasher.finalize(), Crc32c::checksum(&whole));
  }
}
