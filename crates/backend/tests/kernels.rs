//! Contract behaviour through every backend.

mod common;

use backend::{LaneDispatcher, LaneWidth, LookupTable};
use proptest::prelude::*;

fn scalar_sum(data: &[u8]) -> u32 {
  data.iter().fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)))
}

fn whole(len: usize, w: LaneWidth) -> usize {
  len / w.bytes() * w.bytes()
}

#[test]
fn backends_agree_on_every_family() {
  let data = common::gen_bytes(1000, 0xC0FFEE);
  let mut digits: LookupTable = [0; 256];
  for b in b'0'..=b'9' {
    digits[b as usize] = 1;
  }
  let mut upper: LookupTable = [0; 256];
  for (i, slot) in upper.iter_mut().enumerate() {
    *slot = (i as u8).to_ascii_uppercase();
  }

  for b in common::backends() {
    let name = b.strategy();
    for w in LaneWidth::DESCENDING {
      for len in [0usize, 1, 15, 16, 17, 63, 64, 65, 999, 1000] {
        let input = &data[..len];
        let span = &input[..whole(len, w)];

        assert_eq!(b.sum_u8(w, input), scalar_sum(span), "{name} sum {w:?} {len}");
        assert_eq!(b.is_ascii(w, input), span.is_ascii(), "{name} ascii {w:?} {len}");
        assert_eq!(
          b.all_in_set(w, input, &digits),
          span.iter().all(u8::is_ascii_digit),
          "{name} set {w:?} {len}"
        );
        assert_eq!(
          b.crc32c_update(w, 0, input),
          checksum::Crc32c::checksum(span),
          "{name} crc {w:?} {len}"
        );

        let mut dst = vec![0u8; len];
        b.map_bytes(w, input, &mut dst, &upper);
        assert_eq!(&dst[..span.len()], span.to_ascii_uppercase().as_slice(), "{name} map {w:?} {len}");
        assert!(dst[span.len()..].iter().all(|&x| x == 0), "{name} map tail {w:?} {len}");
      }
    }
    assert_eq!(b.crc32c_combine(0x9A71_BB4C, checksum::Crc32c::checksum(b" world"), 6), 0xC994_65AA);
  }
}

#[test]
fn masks_per_width() {
  let mut data = vec![b'.'; 130];
  data[0] = b',';
  data[17] = b',';
  data[127] = b',';

  for b in common::backends() {
    let mut m16 = vec![0u16; 8];
    assert_eq!(b.eq_masks16(&data, b',', &mut m16), 128);
    assert_eq!(m16[0], 1);
    assert_eq!(m16[1], 1 << 1);
    assert_eq!(m16[7], 1 << 15);

    let mut m64 = vec![0u64; 2];
    assert_eq!(b.eq_masks64(&data, b',', &mut m64), 128);
    assert_eq!(m64, vec![1 | (1 << 17), 1 << 63]);
  }
}

#[test]
fn one_two_three_through_each_width_is_six() {
  // Below every lane width: the dispatcher declines and the caller's scalar
  // tail does the work.
  for b in common::backends() {
    let lanes = LaneDispatcher::new(b.as_ref());
    assert!(lanes.sum_u8(&[1, 2, 3]).is_none());
    for w in LaneWidth::DESCENDING {
      let vector = b.sum_u8(w, &[1, 2, 3]);
      assert_eq!(vector.wrapping_add(scalar_sum(&[1, 2, 3])), 6);
    }
  }
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn lane_call_consumes_whole_chunks(data in proptest::collection::vec(any::<u8>(), 16..=300)) {
    for b in common::backends() {
      let lanes = LaneDispatcher::new(b.as_ref());
      let r = lanes.sum_u8(&data).unwrap();
      let w = r.width.unwrap();
      prop_assert_eq!(Some(w), backend::select_width(data.len(), &LaneWidth::DESCENDING));
      prop_assert_eq!(r.consumed, whole(data.len(), w));
      prop_assert_eq!(r.value, scalar_sum(&data[..r.consumed]));
    }
  }
}
