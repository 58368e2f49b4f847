pub mod envelope;
pub mod params;
pub mod results;

pub use envelope::*;
pub use params::*;
pub use results::*;
