//! Trampoline generator for the precompiled backend.
//!
//! The gateway hands every stub a single pointer to an array of 64-bit
//! argument words (the frame). Each generated stub is a naked function that
//! loads those words into the platform's integer argument registers, spills
//! the excess to the stack when the register budget runs out, and transfers
//! control to the kernel. Return values pass through untouched.
//!
//! `build.rs` runs [`generate`] over the kernel contract and writes the
//! result into `OUT_DIR`; the stubs are never edited by hand.
//!
//! This module is shared with the build script and uses only `std`.

use core::fmt::{self, Write as _};

use crate::contract::KernelContract;

// ─────────────────────────────────────────────────────────────────────────────
// Target ABI
// ─────────────────────────────────────────────────────────────────────────────

/// Calling conventions the generator can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Abi {
  /// x86_64 System V (Linux, macOS, BSDs).
  SysV64,
  /// AArch64 AAPCS64; stack arguments occupy 8-byte slots.
  Aapcs64,
  /// Apple's AArch64 variant; stack arguments are packed by natural size.
  Aapcs64Apple,
}

impl Abi {
  /// Map cargo's `CARGO_CFG_TARGET_ARCH` / `CARGO_CFG_TARGET_OS` to an ABI.
  #[must_use]
  pub fn from_target(arch: &str, os: &str) -> Option<Self> {
    match (arch, os) {
      ("x86_64", "windows" | "uefi" | "none") => None,
      ("x86_64", _) => Some(Abi::SysV64),
      ("aarch64", "macos" | "ios" | "tvos" | "watchos" | "visionos") => Some(Abi::Aapcs64Apple),
      ("aarch64", "linux" | "android" | "freebsd" | "netbsd" | "openbsd") => Some(Abi::Aapcs64),
      _ => None,
    }
  }

  /// Integer argument registers, in order.
  #[must_use]
  pub const fn registers(self) -> &'static [&'static str] {
    match self {
      Abi::SysV64 => &["rdi", "rsi", "rdx", "rcx", "r8", "r9"],
      Abi::Aapcs64 | Abi::Aapcs64Apple => &["x0", "x1", "x2", "x3", "x4", "x5", "x6", "x7"],
    }
  }
}

impl fmt::Display for Abi {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Abi::SysV64 => "x86_64 System V",
      Abi::Aapcs64 => "AAPCS64",
      Abi::Aapcs64Apple => "AAPCS64 (Apple)",
    })
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A contract entry the generator cannot express.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StubError {
  /// A float-class parameter would need FP registers; the frame carries
  /// integer words only.
  FloatParam { kernel: &'static str, index: usize },
  /// Arguments beyond the register budget on an ABI whose stack layout the
  /// generator does not model.
  UnsupportedSpill { kernel: &'static str, abi: Abi, params: usize },
}

impl fmt::Display for StubError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StubError::FloatParam { kernel, index } => {
        write!(f, "{kernel}: parameter {index} is float-class; pass its bit pattern as an integer")
      }
      StubError::UnsupportedSpill { kernel, abi, params } => write!(
        f,
        "{kernel}: {params} parameters exceed the {} registers of {abi} and stack spills are not supported there",
        abi.registers().len()
      ),
    }
  }
}

impl core::error::Error for StubError {}

// ─────────────────────────────────────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a Rust source file with one trampoline per contract entry.
///
/// `kernels` is the path of the crate that exports the kernel symbols,
/// e.g. `::lanecall_kernels`.
///
/// # Errors
///
/// Returns the first [`StubError`] encountered.
pub fn generate(abi: Abi, kernels: &str, contracts: &[KernelContract]) -> Result<String, StubError> {
  let mut out = String::new();
  let _ = writeln!(out, "// @generated by backend::stubgen for {abi}. Do not edit.");
  for contract in contracts {
    out.push('\n');
    out.push_str(&trampoline(abi, kernels, contract)?);
  }
  Ok(out)
}

/// Generate a single naked trampoline.
///
/// # Errors
///
/// [`StubError::FloatParam`] for float-class parameters and
/// [`StubError::UnsupportedSpill`] when the ABI cannot spill.
pub fn trampoline(abi: Abi, kernels: &str, contract: &KernelContract) -> Result<String, StubError> {
  if let Some(index) = contract.params.iter().position(|p| p.is_float()) {
    return Err(StubError::FloatParam {
      kernel: contract.name,
      index,
    });
  }

  let n = contract.params.len();
  let lines = match abi {
    Abi::SysV64 => sysv64(n),
    Abi::Aapcs64 => aapcs64(n),
    Abi::Aapcs64Apple if n <= abi.registers().len() => aapcs64(n),
    Abi::Aapcs64Apple => {
      return Err(StubError::UnsupportedSpill {
        kernel: contract.name,
        abi,
        params: n,
      });
    }
  };

  let mut src = String::new();
  let _ = writeln!(src, "#[unsafe(naked)]");
  let _ = write!(src, "pub(crate) unsafe extern \"C\" fn {}(_frame: *const u64)", contract.name);
  if let Some(ret) = contract.ret.rust_type() {
    let _ = write!(src, " -> {ret}");
  }
  let _ = writeln!(src, " {{");
  let _ = writeln!(src, "  core::arch::naked_asm!(");
  for line in &lines {
    let _ = writeln!(src, "    \"{line}\",");
  }
  let _ = writeln!(src, "    target = sym {kernels}::{},", contract.name);
  let _ = writeln!(src, "  )");
  let _ = writeln!(src, "}}");
  Ok(src)
}

fn x86_slot(i: usize) -> String {
  if i == 0 { "qword ptr [rax]".into() } else { format!("qword ptr [rax + {}]", i * 8) }
}

fn a64_slot(base: &str, i: usize) -> String {
  if i == 0 { format!("[{base}]") } else { format!("[{base}, #{}]", i * 8) }
}

/// x86_64 System V: frame pointer arrives in `rdi`.
fn sysv64(n: usize) -> Vec<String> {
  let regs = Abi::SysV64.registers();
  let in_regs = n.min(regs.len());
  let spilled = n - in_regs;
  let mut lines = Vec::new();

  if n == 0 {
    lines.push("jmp {target}".into());
    return lines;
  }

  if spilled == 0 {
    lines.push("mov rax, rdi".into());
    for (i, reg) in regs.iter().take(in_regs).enumerate() {
      lines.push(format!("mov {reg}, {}", x86_slot(i)));
    }
    lines.push("jmp {target}".into());
    return lines;
  }

  // Build a real frame: the spilled words must sit at [rsp] at the call,
  // with rsp 16-byte aligned.
  lines.push("push rbp".into());
  lines.push("mov rbp, rsp".into());
  lines.push("mov rax, rdi".into());
  if spilled % 2 == 1 {
    lines.push("sub rsp, 8".into());
  }
  for i in (in_regs..n).rev() {
    lines.push(format!("push {}", x86_slot(i)));
  }
  for (i, reg) in regs.iter().enumerate() {
    lines.push(format!("mov {reg}, {}", x86_slot(i)));
  }
  lines.push("call {target}".into());
  lines.push("leave".into());
  lines.push("ret".into());
  lines
}

/// AAPCS64 with 8-byte stack slots: frame pointer arrives in `x0`.
fn aapcs64(n: usize) -> Vec<String> {
  let regs = Abi::Aapcs64.registers();
  let in_regs = n.min(regs.len());
  let spilled = n - in_regs;
  let mut lines = Vec::new();

  if spilled == 0 {
    if n > 0 {
      lines.push("mov x9, x0".into());
    }
    for (i, reg) in regs.iter().take(in_regs).enumerate() {
      lines.push(format!("ldr {reg}, {}", a64_slot("x9", i)));
    }
    lines.push("b {target}".into());
    return lines;
  }

  let area = (spilled * 8).next_multiple_of(16);
  lines.push("stp x29, x30, [sp, #-16]!".into());
  lines.push("mov x29, sp".into());
  lines.push("mov x9, x0".into());
  lines.push(format!("sub sp, sp, #{area}"));
  for k in 0..spilled {
    lines.push(format!("ldr x10, {}", a64_slot("x9", in_regs + k)));
    lines.push(format!("str x10, {}", a64_slot("sp", k)));
  }
  for (i, reg) in regs.iter().enumerate() {
    lines.push(format!("ldr {reg}, {}", a64_slot("x9", i)));
  }
  lines.push("bl {target}".into());
  lines.push("mov sp, x29".into());
  lines.push("ldp x29, x30, [sp], #16".into());
  lines.push("ret".into());
  lines
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::contract::{CONTRACTS, KernelId, LaneWidth, Op, Param, Ret};

  fn synthetic(params: &'static [Param]) -> KernelContract {
    KernelContract {
      name: "lanecall_synthetic",
      op: Op::Noop,
      width: None,
      params,
      ret: Ret::U64,
    }
  }

  #[test]
  fn targets() {
    assert_eq!(Abi::from_target("x86_64", "linux"), Some(Abi::SysV64));
    assert_eq!(Abi::from_target("x86_64", "macos"), Some(Abi::SysV64));
    assert_eq!(Abi::from_target("x86_64", "windows"), None);
    assert_eq!(Abi::from_target("aarch64", "linux"), Some(Abi::Aapcs64));
    assert_eq!(Abi::from_target("aarch64", "macos"), Some(Abi::Aapcs64Apple));
    assert_eq!(Abi::from_target("riscv64", "linux"), None);
  }

  #[test]
  fn sysv_register_only_tail_jumps() {
    let sum = KernelId::lane(Op::SumU8, LaneWidth::W16).contract();
    let src = trampoline(Abi::SysV64, "::k", sum).unwrap();
    assert!(src.contains("fn lanecall_sum_u8_16(_frame: *const u64) -> u32"));
    assert!(src.contains("\"mov rdi, qword ptr [rax]\""));
    assert!(src.contains("\"mov rsi, qword ptr [rax + 8]\""));
    assert!(src.contains("\"jmp {target}\""));
    assert!(src.contains("target = sym ::k::lanecall_sum_u8_16"));
    assert!(!src.contains("\"call {target}\""), "register-only calls tail-jump");
  }

  #[test]
  fn sysv_echo_spills_two_words_aligned() {
    let src = trampoline(Abi::SysV64, "::k", KernelId::ABI_ECHO.contract()).unwrap();
    assert!(!src.contains("sub rsp, 8"), "even spill count needs no padding");
    let hi = src.find("push qword ptr [rax + 56]").unwrap();
    let lo = src.find("push qword ptr [rax + 48]").unwrap();
    assert!(hi < lo, "spilled words are pushed last-first");
    assert!(src.contains("\"call {target}\""));
    assert!(src.contains("\"leave\""));
    assert!(!src.contains(" -> "), "echo returns unit");
  }

  #[test]
  fn sysv_probe_pads_odd_spill() {
    let src = trampoline(Abi::SysV64, "::k", KernelId::ABI_PROBE.contract()).unwrap();
    assert!(src.contains("\"sub rsp, 8\""));
    assert!(src.contains("push qword ptr [rax + 48]"));
  }

  #[test]
  fn noop_is_a_bare_jump() {
    let src = trampoline(Abi::SysV64, "::k", KernelId::NOOP.contract()).unwrap();
    assert!(src.contains("\"jmp {target}\""));
    assert!(!src.contains("mov"));
    let src = trampoline(Abi::Aapcs64, "::k", KernelId::NOOP.contract()).unwrap();
    assert!(src.contains("\"b {target}\""));
    assert!(!src.contains("ldr"));
  }

  #[test]
  fn aarch64_fits_every_contract_in_registers() {
    let src = generate(Abi::Aapcs64Apple, "::k", CONTRACTS).unwrap();
    assert!(!src.contains("bl {target}"));
    assert!(src.contains("\"ldr x7, [x9, #56]\""));
  }

  #[test]
  fn aarch64_linux_spills_into_16_byte_area() {
    static NINE: [Param; 9] = [Param::U64; 9];
    let src = trampoline(Abi::Aapcs64, "::k", &synthetic(&NINE)).unwrap();
    assert!(src.contains("\"sub sp, sp, #16\""));
    assert!(src.contains("\"ldr x10, [x9, #64]\""));
    assert!(src.contains("\"str x10, [sp]\""));
    assert!(src.contains("\"bl {target}\""));
  }

  #[test]
  fn apple_spill_is_rejected() {
    static NINE: [Param; 9] = [Param::U64; 9];
    let err = trampoline(Abi::Aapcs64Apple, "::k", &synthetic(&NINE)).unwrap_err();
    assert_eq!(
      err,
      StubError::UnsupportedSpill {
        kernel: "lanecall_synthetic",
        abi: Abi::Aapcs64Apple,
        params: 9
      }
    );
    assert!(err.to_string().contains("8 registers"));
  }

  #[test]
  fn float_param_is_rejected() {
    static FLOAT: [Param; 2] = [Param::Ptr, Param::F64];
    let err = trampoline(Abi::SysV64, "::k", &synthetic(&FLOAT)).unwrap_err();
    assert_eq!(
      err,
      StubError::FloatParam {
        kernel: "lanecall_synthetic",
        index: 1
      }
    );
  }

  #[test]
  fn generate_covers_every_contract() {
    let src = generate(Abi::SysV64, "::lanecall_kernels", CONTRACTS).unwrap();
    assert!(src.starts_with("// @generated"));
    for c in CONTRACTS {
      assert!(src.contains(&format!("fn {}(", c.name)), "{}", c.name);
    }
  }
}
