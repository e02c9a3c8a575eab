//! Arbitrary update sequences on the gateway-routed hasher.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use traits::Checksum;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  /// Chunk sizes for streaming updates
  chunk_sizes: Vec<u16>,
}

fuzz_target!(|input: Input| {
  let data = &input.data;
  let expected = checksum::Crc32c::checksum(data);

  let mut hasher = lanecall::Crc32c::new();
  let mut offset = 0;
  let mut idx = 0;
  while offset < data.len() {
    let size = match input.chunk_sizes.get(idx % input.chunk_sizes.len().max(1)) {
      Some(&s) => usize::from(s % 2048).max(1),
      None => 1,
    };
    let end = (offset + size).min(data.len());
    hasher.update(&data[offset..end]);
    offset = end;
    idx += 1;
  }

  assert_eq!(hasher.finalize(), expected, "streaming mismatch");
});
