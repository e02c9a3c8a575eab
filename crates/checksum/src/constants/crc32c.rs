//! CRC32-C (Castagnoli) constants.
//!
//! Polynomial: 0x1EDC6F41 (reflected: 0x82F63B78)
//! Used by: iSCSI, SCTP, Btrfs, ext4, RocksDB, LevelDB

/// CRC32-C polynomial in reflected (bit-reversed) form.
pub const POLYNOMIAL: u32 = 0x82F6_3B78;

/// Initial register value and final XOR.
pub const INIT: u32 = 0xFFFF_FFFF;

/// Standard byte-at-a-time lookup table (table 0 of the slicing set).
///
/// Also the seed for the combine operators: entry `1 << j` is the image of
/// register bit `j` after one zero byte is shifted through.
pub const TABLE: [u32; 256] = super::tables::generate_table_0_32(POLYNOMIAL);

/// Slicing-by-8 lookup tables (8 * 256 * 4 = 8KB).
pub static TABLES: super::Aligned64<[[u32; 256]; 8]> =
  super::Aligned64(super::tables::generate_slicing_tables_32(POLYNOMIAL));
