pub mod classify;
pub mod options;

pub use classify::*;
pub use options::*;
