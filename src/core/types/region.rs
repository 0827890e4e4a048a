//! Memory region descriptors returned by region queries

use super::Address;

/// Allocation state of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    /// Backed by physical memory or the paging file
    Committed,
    /// Address space reserved without backing
    Reserved,
    /// Not allocated
    Free,
    /// A state code this crate does not recognise
    Other(u32),
}

impl RegionState {
    pub const MEM_COMMIT: u32 = 0x1000;
    pub const MEM_RESERVE: u32 = 0x2000;
    pub const MEM_FREE: u32 = 0x10000;

    /// Raw OS state code
    pub fn code(&self) -> u32 {
        match self {
            RegionState::Committed => Self::MEM_COMMIT,
            RegionState::Reserved => Self::MEM_RESERVE,
            RegionState::Free => Self::MEM_FREE,
            RegionState::Other(code) => *code,
        }
    }
}

impl From<u32> for RegionState {
    fn from(code: u32) -> Self {
        match code {
            Self::MEM_COMMIT => RegionState::Committed,
            Self::MEM_RESERVE => RegionState::Reserved,
            Self::MEM_FREE => RegionState::Free,
            other => RegionState::Other(other),
        }
    }
}

/// Result of a region query at some address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionInfo {
    pub base_address: Address,
    pub allocation_base: Address,
    pub allocation_protect: u32,
    pub protect: u32,
    pub region_size: usize,
    pub state: RegionState,
    pub region_type: u32,
}

impl RegionInfo {
    /// Descriptor for unallocated address space
    pub fn free(base_address: Address, region_size: usize) -> Self {
        RegionInfo {
            base_address,
            allocation_base: Address::null(),
            allocation_protect: 0,
            protect: 0x01, // PAGE_NOACCESS
            region_size,
            state: RegionState::Free,
            region_type: 0,
        }
    }

    /// Check if memory is committed
    pub fn is_committed(&self) -> bool {
        self.state == RegionState::Committed
    }

    /// Whether `address` falls inside this region
    pub fn contains(&self, address: Address) -> bool {
        address
            .distance_from(self.base_address)
            .map_or(false, |delta| delta < self.region_size)
    }
}
