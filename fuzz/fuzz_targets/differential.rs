//! CRC32-C against the `crc` crate and the bitwise reference.

#![no_main]

use crc::{CRC_32_ISCSI, Crc};
use libfuzzer_sys::fuzz_target;

const ORACLE: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

fuzz_target!(|data: &[u8]| {
  let reference = ORACLE.checksum(data);

  let ours = checksum::Crc32c::checksum(data);
  assert_eq!(
    ours,
    reference,
    "checksum: ours={ours:#010x} reference={reference:#010x} len={} via {}",
    data.len(),
    checksum::selected_backend()
  );

  if data.len() <= 4096 {
    assert_eq!(checksum::reference::crc32c(data), reference, "bitwise reference");
  }

  let gateway = lanecall::crc32c(data);
  assert_eq!(
    gateway,
    reference,
    "gateway: ours={gateway:#010x} reference={reference:#010x} len={} via {}",
    data.len(),
    lanecall::strategy()
  );
});
