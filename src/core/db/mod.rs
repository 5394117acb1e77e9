/// Database Module
///
/// The pieces that sit directly on top of the driver:
/// - **Connection Management** (`connection.rs`): configuration, connect and close
/// - **Values** (`value.rs`): dynamically typed scalars bound to and read from statements
/// - **Records** (`record.rs`): ordered column-to-value mappings used for data and rows
pub mod connection;
pub mod record;
pub mod value;

pub use connection::*;
pub use record::*;
pub use value::*;
