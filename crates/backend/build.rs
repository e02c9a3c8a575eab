//! Generates the precompiled backend's trampolines into `OUT_DIR`.

#[allow(dead_code)]
#[path = "src/contract.rs"]
mod contract;

#[allow(dead_code)]
#[path = "src/stubgen.rs"]
mod stubgen;

use std::{env, fs, path::PathBuf};

fn main() {
  println!("cargo::rerun-if-changed=src/contract.rs");
  println!("cargo::rerun-if-changed=src/stubgen.rs");
  println!("cargo::rustc-check-cfg=cfg(lanecall_trampolines)");

  if env::var_os("CARGO_FEATURE_STUB").is_none() {
    return;
  }

  let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
  let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
  let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
    panic!("OUT_DIR is not set");
  };
  let path = out_dir.join("trampolines.rs");

  let source = match stubgen::Abi::from_target(&arch, &os) {
    Some(abi) => match stubgen::generate(abi, "::lanecall_kernels", contract::CONTRACTS) {
      Ok(src) => {
        println!("cargo::rustc-cfg=lanecall_trampolines");
        src
      }
      Err(e) => panic!("trampoline generation failed: {e}"),
    },
    None => format!("// no trampolines for {arch}-{os}\n"),
  };

  if let Err(e) = fs::write(&path, source) {
    panic!("failed to write {}: {e}", path.display());
  }
}
