//! Combine chains over arbitrary splits equal the one-shot digest.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  splits: Vec<usize>,
}

fuzz_target!(|input: Input| {
  let data = &input.data;

  let mut splits: Vec<usize> = input.splits.iter().map(|s| s % (data.len() + 1)).collect();
  splits.sort_unstable();
  splits.dedup();

  let mut pieces = Vec::new();
  let mut prev = 0;
  for &split in &splits {
    if split > prev {
      pieces.push(&data[prev..split]);
      prev = split;
    }
  }
  pieces.push(&data[prev..]);

  let expected = checksum::Crc32c::checksum(data);

  // In-process algebra.
  let mut crc = 0u32;
  for piece in &pieces {
    crc = checksum::crc32c_combine(crc, checksum::Crc32c::checksum(piece), piece.len());
  }
  assert_eq!(crc, expected, "checksum combine chain");

  // Through the gateway's native combine export.
  let mut crc = 0u32;
  for piece in &pieces {
    crc = lanecall::crc32c_combine(crc, lanecall::crc32c(piece), piece.len());
  }
  assert_eq!(crc, expected, "gateway combine chain");
});
