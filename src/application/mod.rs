// Application layer: account and ledger use cases over the repository,
// plus the parsing that turns operator input into typed values.

pub mod error;
pub mod input;
pub mod reporting;
pub mod service;

pub use error::*;
pub use input::*;
pub use reporting::*;
pub use service::*;
