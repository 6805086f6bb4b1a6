pub(super) mod collection;
pub(super) mod conversion;
pub(super) mod core;
pub(super) mod system;

pub use collection::*;
pub use conversion::*;
pub use self::core::*;
pub use system::*;
