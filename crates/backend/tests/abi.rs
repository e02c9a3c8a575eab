//! ABI conformance across every constructible backend.

mod common;

use backend::{
  Backend, ProbeArgs, Strategy,
  harness::{self, EchoRecord},
};

#[test]
fn every_backend_certifies() {
  for b in common::backends() {
    match harness::certify(b.as_ref()) {
      Ok(n) => assert_eq!(n, harness::DEFAULT_VECTORS),
      Err(m) => panic!("{m}"),
    }
  }
}

#[test]
fn echo_returns_arguments_intact() {
  let args = ProbeArgs {
    ptr: 0xDEAD_BEE8,
    len: usize::MAX,
    v32: 0x8000_0001,
    v8: 0x80,
    v64: 0x8000_0000_0000_0001,
    f64_bits: f64::NEG_INFINITY.to_bits(),
    f32_bits: f32::NAN.to_bits(),
  };
  for b in common::backends() {
    assert_eq!(b.abi_echo(args), EchoRecord::from(args), "{}", b.strategy());
  }
}

#[test]
fn noop_crosses_every_gateway() {
  let backends = common::backends();
  assert!(!backends.is_empty());
  for b in &backends {
    for _ in 0..1000 {
      b.noop();
    }
  }
}

#[cfg(feature = "direct")]
#[test]
fn active_is_direct_and_certifies() {
  let b = backend::active();
  assert_eq!(b.strategy(), Strategy::DirectLink);
  harness::certify(b).unwrap();
}
