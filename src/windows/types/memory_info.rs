//! Memory region information wrapper

use crate::core::types::{Address, RegionInfo, RegionState};
use winapi::um::winnt::MEMORY_BASIC_INFORMATION;

/// Owned copy of `MEMORY_BASIC_INFORMATION`
#[derive(Debug, Clone)]
pub struct MemoryBasicInfo {
    pub base_address: Address,
    pub allocation_base: Address,
    pub allocation_protect: u32,
    pub region_size: usize,
    pub state: u32,
    pub protect: u32,
    pub type_flags: u32,
}

impl From<MEMORY_BASIC_INFORMATION> for MemoryBasicInfo {
    fn from(mbi: MEMORY_BASIC_INFORMATION) -> Self {
        MemoryBasicInfo {
            base_address: Address::new(mbi.BaseAddress as usize),
            allocation_base: Address::new(mbi.AllocationBase as usize),
            allocation_protect: mbi.AllocationProtect,
            region_size: mbi.RegionSize,
            state: mbi.State,
            protect: mbi.Protect,
            type_flags: mbi.Type,
        }
    }
}

impl From<MemoryBasicInfo> for RegionInfo {
    fn from(info: MemoryBasicInfo) -> Self {
        RegionInfo {
            base_address: info.base_address,
            allocation_base: info.allocation_base,
            allocation_protect: info.allocation_protect,
            protect: info.protect,
            region_size: info.region_size,
            state: RegionState::from(info.state),
            region_type: info.type_flags,
        }
    }
}
