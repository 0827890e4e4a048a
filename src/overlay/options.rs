//! Bridge and backend option sets

use std::fmt;

/// Capability flags forwarded verbatim to the overlay backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OverlayFlags {
    value: u32,
}

impl OverlayFlags {
    pub const NONE: Self = Self { value: 0 };
    /// Only draw while the target window has focus
    pub const REQUIRE_FOREGROUND: Self = Self { value: 1 << 0 };
    /// Draw the backend's own FPS counter
    pub const DRAW_FPS: Self = Self { value: 1 << 1 };
    pub const VSYNC: Self = Self { value: 1 << 2 };
    pub const FONT_CALIBRI: Self = Self { value: 1 << 3 };
    pub const FONT_ARIAL: Self = Self { value: 1 << 4 };
    pub const FONT_COURIER: Self = Self { value: 1 << 5 };
    pub const FONT_GABRIOLA: Self = Self { value: 1 << 6 };
    pub const FONT_IMPACT: Self = Self { value: 1 << 7 };

    /// Every bit the backend understands
    pub const MASK: u32 = 0xFF;

    /// Combine flags
    pub fn combine(flags: &[Self]) -> Self {
        let mut value = 0;
        for flag in flags {
            value |= flag.value;
        }
        Self { value }
    }

    /// Keep only backend bits from a raw mask
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self {
            value: bits & Self::MASK,
        }
    }

    pub const fn bits(&self) -> u32 {
        self.value
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.value & other.value == other.value
    }

    pub const fn is_empty(&self) -> bool {
        self.value == 0
    }
}

impl std::ops::BitOr for OverlayFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            value: self.value | rhs.value,
        }
    }
}

impl std::ops::BitOrAssign for OverlayFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.value |= rhs.value;
    }
}

impl fmt::Display for OverlayFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.value)
    }
}

/// Options accepted by the frame bridge
///
/// `fast_write` stays inside the process and selects the write primitive;
/// only `overlay` reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeOptions {
    pub fast_write: bool,
    pub overlay: OverlayFlags,
}

impl BridgeOptions {
    /// Bit 8 of the combined mask selects fast writes
    pub const FAST_WRITE_BIT: u32 = 1 << 8;

    /// Split a combined mask into local and backend options
    pub fn from_bits(bits: u32) -> Self {
        BridgeOptions {
            fast_write: bits & Self::FAST_WRITE_BIT != 0,
            overlay: OverlayFlags::from_bits_truncate(bits),
        }
    }

    /// Combined mask, the inverse of [`BridgeOptions::from_bits`]
    pub fn bits(&self) -> u32 {
        let fast = if self.fast_write {
            Self::FAST_WRITE_BIT
        } else {
            0
        };
        self.overlay.bits() | fast
    }
}
