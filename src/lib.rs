pub use trellis_core::*;
pub use trellis_macros::*;
