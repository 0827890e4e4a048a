//! Typed reads and writes against a target process
//!
//! Every operation takes an absolute address in the target's address space.
//! Raw transfers report how many bytes moved; typed reads refuse to decode a
//! partially filled value and return [`MemoryError::PartialTransfer`].

use super::{ProcessMemory, WriteStrategy};
use crate::core::types::{Address, Matrix4x4, MemoryError, MemoryResult, RegionInfo, Vector3};
use bytemuck::{AnyBitPattern, NoUninit};
use std::fmt;
use std::mem;
use tracing::{debug, trace};

/// Bytes fetched by [`MemoryAccessor::read_string`]
pub const STRING_READ_SIZE: usize = 512;

/// Result of a raw read
///
/// `bytes` always has the requested length; only the first `bytes_read`
/// entries came from the target, the rest are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub bytes: Vec<u8>,
    pub bytes_read: usize,
}

impl ReadOutcome {
    /// Whether the whole request was transferred
    pub fn is_complete(&self) -> bool {
        self.bytes_read == self.bytes.len()
    }

    /// The bytes that actually came from the target
    pub fn filled(&self) -> &[u8] {
        &self.bytes[..self.bytes_read]
    }
}

/// Capability object for one target process
pub struct MemoryAccessor {
    source: Box<dyn ProcessMemory>,
    strategy: WriteStrategy,
}

impl MemoryAccessor {
    /// Wrap any memory source
    pub fn new(source: Box<dyn ProcessMemory>, strategy: WriteStrategy) -> Self {
        MemoryAccessor { source, strategy }
    }

    /// Open `pid` with read, write, operation and query rights
    #[cfg(windows)]
    pub fn attach(pid: u32, fast_write: bool) -> MemoryResult<Self> {
        let handle = crate::process::ProcessHandle::open_for_read_write(pid)?;
        Ok(Self::new(
            Box::new(handle),
            WriteStrategy::from_fast_write(fast_write),
        ))
    }

    /// Open `pid` with read, write, operation and query rights
    #[cfg(not(windows))]
    pub fn attach(pid: u32, fast_write: bool) -> MemoryResult<Self> {
        let _ = (pid, fast_write);
        Err(MemoryError::unsupported(
            "process memory access requires Windows",
        ))
    }

    pub fn pid(&self) -> u32 {
        self.source.pid()
    }

    pub fn strategy(&self) -> WriteStrategy {
        self.strategy
    }

    /// Switch the primitive used by later writes
    pub fn set_strategy(&mut self, strategy: WriteStrategy) {
        self.strategy = strategy;
    }

    /// Read `size` bytes, reporting how many actually transferred
    pub fn read_bytes(&self, address: Address, size: usize) -> MemoryResult<ReadOutcome> {
        let mut bytes = vec![0u8; size];
        // a source may not claim more than the buffer holds
        let bytes_read = self.source.read_memory(address, &mut bytes)?.min(size);
        if bytes_read < size {
            debug!("Short read at {}: {} of {} bytes", address, bytes_read, size);
        }
        Ok(ReadOutcome { bytes, bytes_read })
    }

    /// Read exactly `N` bytes or fail with `PartialTransfer`
    fn read_exact<const N: usize>(&self, address: Address) -> MemoryResult<[u8; N]> {
        let mut buffer = [0u8; N];
        let bytes_read = self.source.read_memory(address, &mut buffer)?;
        if bytes_read != N {
            return Err(MemoryError::partial_transfer(address, N, bytes_read));
        }
        Ok(buffer)
    }

    pub fn read_byte(&self, address: Address) -> MemoryResult<u8> {
        let [byte] = self.read_exact::<1>(address)?;
        Ok(byte)
    }

    pub fn read_i32(&self, address: Address) -> MemoryResult<i32> {
        self.read_exact(address).map(i32::from_le_bytes)
    }

    pub fn read_u32(&self, address: Address) -> MemoryResult<u32> {
        self.read_exact(address).map(u32::from_le_bytes)
    }

    pub fn read_i64(&self, address: Address) -> MemoryResult<i64> {
        self.read_exact(address).map(i64::from_le_bytes)
    }

    pub fn read_f32(&self, address: Address) -> MemoryResult<f32> {
        self.read_exact(address).map(f32::from_le_bytes)
    }

    pub fn read_f64(&self, address: Address) -> MemoryResult<f64> {
        self.read_exact(address).map(f64::from_le_bytes)
    }

    /// Three consecutive floats
    pub fn read_vector3(&self, address: Address) -> MemoryResult<Vector3> {
        self.read_exact(address).map(Vector3::from_le_bytes)
    }

    /// Sixteen consecutive floats, row-major (`M11, M12, .. M44`)
    pub fn read_matrix(&self, address: Address) -> MemoryResult<Matrix4x4> {
        self.read_exact(address).map(Matrix4x4::from_le_bytes)
    }

    /// Read a plain-data struct laid out as `T`
    ///
    /// The layout of `T` (field order, padding, `#[repr(C)]`) must match the
    /// target's; nothing here can check that.
    pub fn read_struct<T: AnyBitPattern>(&self, address: Address) -> MemoryResult<T> {
        let size = mem::size_of::<T>();
        let outcome = self.read_bytes(address, size)?;
        if !outcome.is_complete() {
            return Err(MemoryError::partial_transfer(
                address,
                size,
                outcome.bytes_read,
            ));
        }
        Ok(bytemuck::pod_read_unaligned(&outcome.bytes))
    }

    /// Read up to [`STRING_READ_SIZE`] single-byte characters
    ///
    /// Stops at the first zero byte. Bytes outside ASCII decode as `?`.
    pub fn read_string(&self, address: Address) -> MemoryResult<String> {
        let outcome = self.read_bytes(address, STRING_READ_SIZE)?;
        let filled = outcome.filled();
        let end = filled.iter().position(|&b| b == 0).unwrap_or(filled.len());
        Ok(filled[..end]
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect())
    }

    /// Write `data`; true iff every byte was written
    pub fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<bool> {
        let written = self.source.write_memory(address, data, self.strategy)?;
        trace!(
            "{} write at {}: {} of {} bytes",
            self.strategy,
            address,
            written,
            data.len()
        );
        if written != data.len() {
            debug!(
                "Short write at {}: {} of {} bytes",
                address,
                written,
                data.len()
            );
        }
        Ok(written == data.len())
    }

    pub fn write_byte(&self, address: Address, value: u8) -> MemoryResult<bool> {
        self.write_bytes(address, &[value])
    }

    pub fn write_i32(&self, address: Address, value: i32) -> MemoryResult<bool> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u32(&self, address: Address, value: u32) -> MemoryResult<bool> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_i64(&self, address: Address, value: i64) -> MemoryResult<bool> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_f32(&self, address: Address, value: f32) -> MemoryResult<bool> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_f64(&self, address: Address, value: f64) -> MemoryResult<bool> {
        self.write_bytes(address, &value.to_le_bytes())
    }

    /// Write single-byte text without a terminator
    ///
    /// Characters outside ASCII are written as `?`.
    pub fn write_string(&self, address: Address, value: &str) -> MemoryResult<bool> {
        let bytes: Vec<u8> = value
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        self.write_bytes(address, &bytes)
    }

    /// Write a plain-data struct as its in-memory bytes
    pub fn write_struct<T: NoUninit>(&self, address: Address, value: &T) -> MemoryResult<bool> {
        self.write_bytes(address, bytemuck::bytes_of(value))
    }

    /// Describe the region containing `address`
    pub fn query_region(&self, address: Address) -> MemoryResult<RegionInfo> {
        self.source.query_region(address)
    }

    /// Whether `address` is backed by committed memory
    pub fn is_valid(&self, address: Address) -> bool {
        match self.source.query_region(address) {
            Ok(region) => region.is_committed(),
            Err(e) => {
                debug!("Region query at {} failed: {}", address, e);
                false
            }
        }
    }
}

impl fmt::Debug for MemoryAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAccessor")
            .field("pid", &self.pid())
            .field("strategy", &self.strategy)
            .finish()
    }
}
