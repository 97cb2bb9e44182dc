pub mod errors;
pub mod table;
pub mod units;

pub use errors::{AppError, Cause, ErrorKind};
pub use table::Table;
pub use units::{format_ether, parse_ether};
