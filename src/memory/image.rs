//! In-memory stand-in for a target process
//!
//! A [`MemoryImage`] is a set of mapped byte regions behind the same
//! [`ProcessMemory`] contract the OS handle follows: transfers stop at the
//! first unmapped (or, for writes, read-only) byte and report the count.
//! Clones share state, so a test can hand one clone to an accessor and
//! inspect the other.

use super::{ProcessMemory, WriteStrategy};
use crate::core::types::{Address, MemoryError, MemoryResult, RegionInfo, RegionState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const PAGE_READONLY: u32 = 0x02;
const PAGE_READWRITE: u32 = 0x04;
const MEM_PRIVATE: u32 = 0x20000;
const PAGE_SIZE: usize = 0x1000;

/// One write that reached the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub address: Address,
    pub len: usize,
    pub strategy: WriteStrategy,
}

#[derive(Debug)]
struct Region {
    base: usize,
    data: Vec<u8>,
    writable: bool,
}

impl Region {
    fn end(&self) -> usize {
        self.base + self.data.len()
    }

    fn contains(&self, address: usize) -> bool {
        address >= self.base && address < self.end()
    }
}

#[derive(Debug, Default)]
struct ImageState {
    regions: Vec<Region>,
    writes: Vec<WriteRecord>,
    terminated: bool,
    denied: bool,
}

impl ImageState {
    fn region_at(&self, address: usize) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains(address))
    }

    fn region_at_mut(&mut self, address: usize) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.contains(address))
    }
}

/// Shared in-memory address space
#[derive(Debug, Clone)]
pub struct MemoryImage {
    pid: u32,
    state: Arc<Mutex<ImageState>>,
}

impl MemoryImage {
    /// Empty address space for `pid`
    pub fn new(pid: u32) -> Self {
        MemoryImage {
            pid,
            state: Arc::new(Mutex::new(ImageState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ImageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Map a writable region holding `data` at `base`
    ///
    /// Regions must not overlap; a later mapping that overlaps an earlier
    /// one replaces it.
    pub fn map(&self, base: Address, data: impl Into<Vec<u8>>) -> &Self {
        self.insert(base, data.into(), true);
        self
    }

    /// Map a region that rejects writes
    pub fn map_read_only(&self, base: Address, data: impl Into<Vec<u8>>) -> &Self {
        self.insert(base, data.into(), false);
        self
    }

    /// Builder form of [`MemoryImage::map`]
    pub fn with_region(self, base: Address, data: impl Into<Vec<u8>>) -> Self {
        self.insert(base, data.into(), true);
        self
    }

    fn insert(&self, base: Address, data: Vec<u8>, writable: bool) {
        let base = base.as_usize();
        let end = base + data.len();
        let mut state = self.lock();
        state.regions.retain(|r| r.end() <= base || r.base >= end);
        state.regions.push(Region {
            base,
            data,
            writable,
        });
        state.regions.sort_by_key(|r| r.base);
    }

    /// Current contents at `address`, if all `len` bytes are mapped
    pub fn peek(&self, address: Address, len: usize) -> Option<Vec<u8>> {
        let mut buffer = vec![0u8; len];
        let copied = Self::copy_out(&self.lock(), address.as_usize(), &mut buffer);
        (copied == len).then_some(buffer)
    }

    /// Every write that reached the image, oldest first
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock().writes.clone()
    }

    /// Drain the write log; long-running users call this between frames
    pub fn take_writes(&self) -> Vec<WriteRecord> {
        std::mem::take(&mut self.lock().writes)
    }

    /// Make every later call fail as if the process exited
    pub fn terminate(&self) {
        self.lock().terminated = true;
    }

    /// Make every later call fail as if the handle lost its rights
    pub fn deny_access(&self) {
        self.lock().denied = true;
    }

    fn check(&self, state: &ImageState, op: &str, address: Address) -> MemoryResult<()> {
        if state.terminated {
            return Err(MemoryError::TargetGone(self.pid));
        }
        if state.denied {
            return Err(MemoryError::access_denied(
                self.pid,
                format!("{} at {}", op, address),
            ));
        }
        Ok(())
    }

    fn copy_out(state: &ImageState, address: usize, buffer: &mut [u8]) -> usize {
        let mut copied = 0;
        while copied < buffer.len() {
            let cursor = address + copied;
            let Some(region) = state.region_at(cursor) else {
                break;
            };
            let offset = cursor - region.base;
            let chunk = (region.data.len() - offset).min(buffer.len() - copied);
            buffer[copied..copied + chunk].copy_from_slice(&region.data[offset..offset + chunk]);
            copied += chunk;
        }
        copied
    }
}

impl ProcessMemory for MemoryImage {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn read_memory(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        let state = self.lock();
        self.check(&state, "read", address)?;
        Ok(Self::copy_out(&state, address.as_usize(), buffer))
    }

    fn write_memory(
        &self,
        address: Address,
        data: &[u8],
        strategy: WriteStrategy,
    ) -> MemoryResult<usize> {
        let mut state = self.lock();
        self.check(&state, "write", address)?;

        let mut written = 0;
        while written < data.len() {
            let cursor = address.as_usize() + written;
            let Some(region) = state.region_at_mut(cursor) else {
                break;
            };
            if !region.writable {
                break;
            }
            let offset = cursor - region.base;
            let chunk = (region.data.len() - offset).min(data.len() - written);
            region.data[offset..offset + chunk].copy_from_slice(&data[written..written + chunk]);
            written += chunk;
        }

        state.writes.push(WriteRecord {
            address,
            len: written,
            strategy,
        });
        Ok(written)
    }

    fn query_region(&self, address: Address) -> MemoryResult<RegionInfo> {
        let state = self.lock();
        self.check(&state, "query", address)?;

        match state.region_at(address.as_usize()) {
            Some(region) => {
                let protect = if region.writable {
                    PAGE_READWRITE
                } else {
                    PAGE_READONLY
                };
                Ok(RegionInfo {
                    base_address: Address::new(region.base),
                    allocation_base: Address::new(region.base),
                    allocation_protect: protect,
                    protect,
                    region_size: region.data.len(),
                    state: RegionState::Committed,
                    region_type: MEM_PRIVATE,
                })
            }
            None => {
                let page = address.as_usize() & !(PAGE_SIZE - 1);
                Ok(RegionInfo::free(Address::new(page), PAGE_SIZE))
            }
        }
    }
}
