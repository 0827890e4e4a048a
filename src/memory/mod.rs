//! Memory access for the target process
//!
//! This module provides:
//! - [`ProcessMemory`], the seam between the accessor and the OS (or any
//!   other source of foreign memory)
//! - [`MemoryAccessor`], typed reads and writes with explicit short-transfer
//!   reporting
//! - [`MemoryImage`], an in-memory target used by tests and benches

pub mod accessor;
pub mod image;

pub use accessor::{MemoryAccessor, ReadOutcome, STRING_READ_SIZE};
pub use image::{MemoryImage, WriteRecord};

use crate::core::types::{Address, MemoryResult, RegionInfo};
use std::fmt;

/// Which OS primitive a write goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WriteStrategy {
    /// `WriteProcessMemory`
    #[default]
    Standard,
    /// `NtWriteVirtualMemory`, no protection bookkeeping
    Fast,
}

impl WriteStrategy {
    pub fn from_fast_write(fast_write: bool) -> Self {
        if fast_write {
            WriteStrategy::Fast
        } else {
            WriteStrategy::Standard
        }
    }

    pub fn is_fast(&self) -> bool {
        matches!(self, WriteStrategy::Fast)
    }
}

impl fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStrategy::Standard => write!(f, "standard"),
            WriteStrategy::Fast => write!(f, "fast"),
        }
    }
}

/// Raw access to another address space
///
/// Transfers return the number of bytes the OS actually moved. An
/// unmapped or protected address is a short count, not an error; `Err` is
/// reserved for faults on the handle itself (`AccessDenied`, `TargetGone`).
pub trait ProcessMemory: Send {
    /// Process id the source is bound to
    fn pid(&self) -> u32;

    /// Copy from `address` into `buffer`
    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize>;

    /// Copy `data` to `address` through the chosen primitive
    fn write_memory(
        &self,
        address: Address,
        data: &[u8],
        strategy: WriteStrategy,
    ) -> MemoryResult<usize>;

    /// Describe the region containing `address`
    fn query_region(&self, address: Address) -> MemoryResult<RegionInfo>;
}
