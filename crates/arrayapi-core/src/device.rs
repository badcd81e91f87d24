//! Device Abstraction - Where Array Buffers Live
//!
//! Arrays are always resident in host memory. The device tag exists so
//! exported buffers can describe their location to a consumer.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use core::fmt;

// =============================================================================
// Device Enum
// =============================================================================

/// A compute device holding array storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// Host memory.
    #[default]
    Cpu,
}

impl Device {
    /// Device type code used in exchanged buffer descriptors.
    #[must_use]
    pub const fn dlpack_code(self) -> i32 {
        match self {
            Self::Cpu => 1,
        }
    }

    /// Device ordinal.
    #[must_use]
    pub const fn index(self) -> usize {
        0
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
        }
    }
}
