mod budget;
mod money;
mod transaction;
mod user;

pub use budget::*;
pub use money::*;
pub use transaction::*;
pub use user::*;
