//! Public operations on the active backend.

mod common;

use crc::{CRC_32_ISCSI, Crc};
use lanecall::{Config, Dispatcher, Path, Strategy, ThresholdOp, config};
use traits::{Checksum, ChecksumCombine};

const ORACLE: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

#[test]
fn sum_wraps_at_u32() {
  let data = vec![0xFFu8; 16_843_010];
  assert_eq!(lanecall::sum_u8(&data), 254);
}

#[test]
fn golden_crc_values() {
  assert_eq!(lanecall::crc32c(b"hello"), 0x9A71_BB4C);
  assert_eq!(lanecall::crc32c(b"hello world"), 0xC994_65AA);
  assert_eq!(lanecall::crc32c(b"123456789"), 0xE306_9283);
}

#[test]
fn crc_matches_oracle_around_threshold() {
  let data = common::gen_bytes(5000, 0x1234_5678);
  for len in (1000..1050).chain([0, 1, 15, 64, 4096, 5000]) {
    let input = &data[..len];
    assert_eq!(lanecall::crc32c(input), ORACLE.checksum(input), "len {len}");
  }
}

#[test]
fn combine_splits_agree() {
  let data = common::gen_bytes(3000, 99);
  let whole = lanecall::crc32c(&data);
  for split in [0usize, 1, 15, 16, 1023, 1024, 2999, 3000] {
    let (a, b) = data.split_at(split);
    let combined = lanecall::crc32c_combine(lanecall::crc32c(a), lanecall::crc32c(b), b.len());
    assert_eq!(combined, whole, "split {split}");
  }
}

#[test]
fn streaming_hasher_matches_one_shot() {
  let data = common::gen_bytes(10_000, 5);
  let mut h = lanecall::Crc32c::new();
  for piece in data.chunks(777) {
    h.update(piece);
  }
  assert_eq!(h.finalize(), lanecall::crc32c(&data));
  assert_eq!(h.finalize(), checksum::Crc32c::checksum(&data));

  let (a, b) = data.split_at(4321);
  assert_eq!(
    lanecall::Crc32c::combine(lanecall::Crc32c::checksum(a), lanecall::Crc32c::checksum(b), b.len()),
    h.finalize()
  );
}

#[test]
fn set_membership_and_ascii() {
  let digits = lanecall::byte_set(b"0123456789");
  let mut data = b"0123456789".repeat(50);
  assert!(lanecall::all_bytes_in_set(&data, &digits));
  assert!(lanecall::is_ascii(&data));
  data[333] = b'x';
  assert!(!lanecall::all_bytes_in_set(&data, &digits));
  data[333] = 0xF0;
  assert!(!lanecall::is_ascii(&data));
}

#[test]
fn map_uppercases_and_leaves_rest_of_dst() {
  let lut = lanecall::byte_map(|b| b.to_ascii_uppercase());
  let src = b"the quick brown fox jumps over the lazy dog".repeat(5);
  let mut dst = vec![0xEEu8; src.len() + 7];
  assert_eq!(lanecall::map_bytes(&mut dst, &src, &lut), src.len());
  assert_eq!(&dst[..src.len()], src.to_ascii_uppercase().as_slice());
  assert!(dst[src.len()..].iter().all(|&b| b == 0xEE));
}

#[test]
#[should_panic(expected = "map_bytes: destination holds")]
fn map_rejects_short_destination() {
  let lut = lanecall::byte_map(|b| b);
  let mut dst = [0u8; 3];
  lanecall::map_bytes(&mut dst, &[1, 2, 3, 4], &lut);
}

#[test]
fn masks_cover_whole_chunks_only() {
  let mut data = vec![0u8; 40];
  data[0] = b',';
  data[17] = b',';
  data[39] = b',';
  let mut out = [0u16; 2];
  assert_eq!(lanecall::eq_u8_masks16(&data, b',', &mut out), 32);
  assert_eq!(out, [1, 1 << 1]);

  let mut out = [0u32; 1];
  assert_eq!(lanecall::eq_u8_masks32(&data, b',', &mut out), 32);
  assert_eq!(out, [1 | 1 << 17]);

  let mut out = [0u64; 1];
  assert_eq!(lanecall::eq_u8_masks64(&data, b',', &mut out), 0);
  assert_eq!(out, [0]);
}

#[test]
#[should_panic(expected = "eq_u8_masks16: output holds")]
fn masks_reject_short_output() {
  let mut out = [0u16; 1];
  let _ = lanecall::eq_u8_masks16(&[0u8; 48], 0, &mut out);
}

#[test]
fn thresholds_switch_paths_at_boundary() {
  for b in common::backends() {
    for strategy in Strategy::ALL {
      let d = Dispatcher::with_config(&*b, Config::tuned(strategy));
      let t = config::tuned_defaults(strategy);
      for op in ThresholdOp::ALL {
        let n = t.get(op);
        assert_eq!(d.path(op, n - 1), Path::Scalar, "{strategy} {op:?}");
        assert_eq!(d.path(op, n), Path::Vector, "{strategy} {op:?}");
      }
    }
  }
}

#[test]
fn lowered_threshold_still_correct() {
  let data = common::gen_bytes(200, 3);
  for b in common::backends() {
    let config = Config {
      thresholds: lanecall::Thresholds::uniform(1),
      ..Config::tuned(b.strategy())
    };
    let d = Dispatcher::with_config(&*b, config);
    for len in 0..data.len() {
      let input = &data[..len];
      assert_eq!(d.sum_u8(input), lanecall::scalar::sum_u8(input), "{len}");
      assert_eq!(d.crc32c_update(0, input), ORACLE.checksum(input), "{len}");
    }
  }
}

#[test]
fn concurrent_first_use() {
  let data = common::gen_bytes(4096, 11);
  let expected = ORACLE.checksum(&data);
  std::thread::scope(|s| {
    for _ in 0..8 {
      s.spawn(|| {
        lanecall::noop();
        assert_eq!(lanecall::crc32c(&data), expected);
      });
    }
  });
}
