pub mod failure;
pub mod handle_cache;
pub mod option;
pub mod terraform;
pub mod traits;

pub use failure::*;
pub use handle_cache::*;
pub use option::*;
pub use terraform::*;
pub use traits::*;
