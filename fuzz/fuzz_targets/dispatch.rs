//! Forced vector path equals forced scalar path for every operation.

#![no_main]

use arbitrary::Arbitrary;
use lanecall::{Config, Dispatcher, Force};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  set: Vec<u8>,
  rotate: u8,
  needle: u8,
  init: u32,
}

fuzz_target!(|input: Input| {
  let backend = backend::active();
  let strategy = lanecall::strategy();
  let vector = Dispatcher::with_config(backend, Config { force: Force::Vector, ..Config::tuned(strategy) });
  let scalar = Dispatcher::with_config(backend, Config { force: Force::Scalar, ..Config::tuned(strategy) });

  let data = &input.data;
  let set = lanecall::byte_set(&input.set);
  let map = lanecall::byte_map(|b| b.rotate_left(u32::from(input.rotate % 8)));

  assert_eq!(vector.sum_u8(data), scalar.sum_u8(data), "sum_u8");
  assert_eq!(vector.is_ascii(data), scalar.is_ascii(data), "is_ascii");
  assert_eq!(vector.all_bytes_in_set(data, &set), scalar.all_bytes_in_set(data, &set), "all_bytes_in_set");
  assert_eq!(vector.crc32c_update(input.init, data), scalar.crc32c_update(input.init, data), "crc32c_update");

  let mut v = vec![0u8; data.len()];
  let mut s = vec![0u8; data.len()];
  vector.map_bytes(&mut v, data, &map);
  scalar.map_bytes(&mut s, data, &map);
  assert_eq!(v, s, "map_bytes");

  let mut got = vec![0u64; data.len() / 64];
  let mut want = vec![0u64; data.len() / 64];
  assert_eq!(vector.eq_u8_masks64(data, input.needle, &mut got), data.len() / 64 * 64);
  lanecall::scalar::eq_u8_masks64(data, input.needle, &mut want);
  assert_eq!(got, want, "eq_u8_masks64");
});
