//! Kernel contract: the symbols, parameter lists and return types every
//! backend must marshal identically.
//!
//! This file is also compiled into `build.rs` to drive trampoline
//! generation, so it depends on nothing but `core`.

// ─────────────────────────────────────────────────────────────────────────────
// Lane widths
// ─────────────────────────────────────────────────────────────────────────────

/// Vector lane width in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaneWidth {
  W16,
  W32,
  W64,
}

impl LaneWidth {
  /// Widest first.
  pub const DESCENDING: [LaneWidth; 3] = [LaneWidth::W64, LaneWidth::W32, LaneWidth::W16];

  #[inline]
  #[must_use]
  pub const fn bytes(self) -> usize {
    match self {
      LaneWidth::W16 => 16,
      LaneWidth::W32 => 32,
      LaneWidth::W64 => 64,
    }
  }

  #[inline]
  #[must_use]
  const fn slot(self) -> usize {
    match self {
      LaneWidth::W16 => 0,
      LaneWidth::W32 => 1,
      LaneWidth::W64 => 2,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameter and return classes
// ─────────────────────────────────────────────────────────────────────────────

/// Parameter class as seen by the C ABI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
  Ptr,
  MutPtr,
  Len,
  U8,
  U32,
  U64,
  /// Float passed by value (FP register class). No kernel takes one; float
  /// data crosses the gateway as bit patterns in `U32`/`U64` slots.
  F32,
  F64,
}

impl Param {
  #[inline]
  #[must_use]
  pub const fn is_float(self) -> bool {
    matches!(self, Param::F32 | Param::F64)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ret {
  Unit,
  U8,
  U32,
  U64,
  Usize,
}

impl Ret {
  /// Rust spelling of the return type, `None` for unit.
  #[must_use]
  pub const fn rust_type(self) -> Option<&'static str> {
    match self {
      Ret::Unit => None,
      Ret::U8 => Some("u8"),
      Ret::U32 => Some("u32"),
      Ret::U64 => Some("u64"),
      Ret::Usize => Some("usize"),
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Kernel family. The first six come in one variant per [`LaneWidth`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
  SumU8,
  IsAscii,
  ValidateLut,
  MapLut,
  EqMasks,
  Crc32cUpdate,
  Crc32cCombine,
  Noop,
  AbiProbe,
  AbiEcho,
}

/// Dense index of a contract entry; `CONTRACTS[id.index()]` is its contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KernelId(usize);

/// Number of contract entries.
pub const KERNEL_COUNT: usize = 22;

impl KernelId {
  pub const CRC32C_COMBINE: KernelId = KernelId(18);
  pub const NOOP: KernelId = KernelId(19);
  pub const ABI_PROBE: KernelId = KernelId(20);
  pub const ABI_ECHO: KernelId = KernelId(21);

  /// Id of a lane-width family member.
  ///
  /// Non-lane ops ignore `width` and map to their single entry.
  #[inline]
  #[must_use]
  pub const fn lane(op: Op, width: LaneWidth) -> Self {
    let family = match op {
      Op::SumU8 => 0,
      Op::IsAscii => 1,
      Op::ValidateLut => 2,
      Op::MapLut => 3,
      Op::EqMasks => 4,
      Op::Crc32cUpdate => 5,
      Op::Crc32cCombine => return Self::CRC32C_COMBINE,
      Op::Noop => return Self::NOOP,
      Op::AbiProbe => return Self::ABI_PROBE,
      Op::AbiEcho => return Self::ABI_ECHO,
    };
    KernelId(family * 3 + width.slot())
  }

  #[inline]
  #[must_use]
  pub const fn index(self) -> usize {
    self.0
  }

  #[inline]
  #[must_use]
  #[allow(clippy::indexing_slicing)] // ids are only minted here, all below KERNEL_COUNT
  pub fn contract(self) -> &'static KernelContract {
    &CONTRACTS[self.0]
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Contract table
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelContract {
  /// Exported symbol.
  pub name: &'static str,
  pub op: Op,
  pub width: Option<LaneWidth>,
  pub params: &'static [Param],
  pub ret: Ret,
}

impl KernelContract {
  const fn lane(op: Op, width: LaneWidth, name: &'static str, params: &'static [Param], ret: Ret) -> Self {
    Self {
      name,
      op,
      width: Some(width),
      params,
      ret,
    }
  }

  const fn single(op: Op, name: &'static str, params: &'static [Param], ret: Ret) -> Self {
    Self {
      name,
      op,
      width: None,
      params,
      ret,
    }
  }

  #[inline]
  #[must_use]
  pub const fn id(&self) -> KernelId {
    match self.width {
      Some(w) => KernelId::lane(self.op, w),
      None => KernelId::lane(self.op, LaneWidth::W16),
    }
  }
}

const BUF: &[Param] = &[Param::Ptr, Param::Len];
const BUF_LUT: &[Param] = &[Param::Ptr, Param::Len, Param::Ptr];
const MAP: &[Param] = &[Param::Ptr, Param::Len, Param::MutPtr, Param::Ptr];
const MASKS: &[Param] = &[Param::Ptr, Param::Len, Param::U8, Param::MutPtr];
const CRC: &[Param] = &[Param::Ptr, Param::Len, Param::U32];
const PROBE: &[Param] = &[
  Param::Ptr,
  Param::Len,
  Param::U32,
  Param::U8,
  Param::U64,
  Param::U64,
  Param::U32,
];
const ECHO: &[Param] = &[
  Param::Ptr,
  Param::Len,
  Param::U32,
  Param::U8,
  Param::U64,
  Param::U64,
  Param::U32,
  Param::MutPtr,
];

use self::LaneWidth::{W16, W32, W64};

/// Every exported kernel, ordered by [`KernelId`].
pub const CONTRACTS: &[KernelContract; KERNEL_COUNT] = &[
  KernelContract::lane(Op::SumU8, W16, "lanecall_sum_u8_16", BUF, Ret::U32),
  KernelContract::lane(Op::SumU8, W32, "lanecall_sum_u8_32", BUF, Ret::U32),
  KernelContract::lane(Op::SumU8, W64, "lanecall_sum_u8_64", BUF, Ret::U32),
  KernelContract::lane(Op::IsAscii, W16, "lanecall_is_ascii_16", BUF, Ret::U8),
  KernelContract::lane(Op::IsAscii, W32, "lanecall_is_ascii_32", BUF, Ret::U8),
  KernelContract::lane(Op::IsAscii, W64, "lanecall_is_ascii_64", BUF, Ret::U8),
  KernelContract::lane(Op::ValidateLut, W16, "lanecall_validate_u8_lut_16", BUF_LUT, Ret::U8),
  KernelContract::lane(Op::ValidateLut, W32, "lanecall_validate_u8_lut_32", BUF_LUT, Ret::U8),
  KernelContract::lane(Op::ValidateLut, W64, "lanecall_validate_u8_lut_64", BUF_LUT, Ret::U8),
  KernelContract::lane(Op::MapLut, W16, "lanecall_map_u8_lut_16", MAP, Ret::Unit),
  KernelContract::lane(Op::MapLut, W32, "lanecall_map_u8_lut_32", MAP, Ret::Unit),
  KernelContract::lane(Op::MapLut, W64, "lanecall_map_u8_lut_64", MAP, Ret::Unit),
  KernelContract::lane(Op::EqMasks, W16, "lanecall_eq_u8_masks_16", MASKS, Ret::Usize),
  KernelContract::lane(Op::EqMasks, W32, "lanecall_eq_u8_masks_32", MASKS, Ret::Usize),
  KernelContract::lane(Op::EqMasks, W64, "lanecall_eq_u8_masks_64", MASKS, Ret::Usize),
  KernelContract::lane(Op::Crc32cUpdate, W16, "lanecall_crc32c_update_16", CRC, Ret::U32),
  KernelContract::lane(Op::Crc32cUpdate, W32, "lanecall_crc32c_update_32", CRC, Ret::U32),
  KernelContract::lane(Op::Crc32cUpdate, W64, "lanecall_crc32c_update_64", CRC, Ret::U32),
  KernelContract::single(
    Op::Crc32cCombine,
    "lanecall_crc32c_combine",
    &[Param::U32, Param::U32, Param::Len],
    Ret::U32,
  ),
  KernelContract::single(Op::Noop, "lanecall_noop", &[], Ret::Unit),
  KernelContract::single(Op::AbiProbe, "lanecall_abi_probe", PROBE, Ret::U64),
  KernelContract::single(Op::AbiEcho, "lanecall_abi_echo", ECHO, Ret::Unit),
];
