pub mod docs;
pub mod error;
pub mod handlers;
pub mod query;
pub mod request_log;
pub mod routes;

pub use error::*;
pub use handlers::*;
pub use routes::*;
