mod conversion;
mod registry;

pub use {conversion::*, registry::*};

/// Number of entries returned by enumeration queries when no limit is given.
pub const DEFAULT_PAGE_LIMIT: u32 = 30;
