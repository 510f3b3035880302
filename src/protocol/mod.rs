//! RESP Protocol Implementation
//!
//! The wire layer the façade speaks to a store: [`RespValue`] models every
//! reply shape, and [`RespParser`] frames replies out of a byte stream.
//!
//! ## Modules
//!
//! - `types`: Defines the `RespValue` enum and serialization
//! - `parser`: Incremental parser for replies arriving from the store
//!
//! ## Example
//!
//! ```
//! use kvfacade::protocol::{parse_message, RespValue};
//!
//! let (value, consumed) = parse_message(b":2\r\n").unwrap().unwrap();
//! assert_eq!(value, RespValue::integer(2));
//! assert_eq!(consumed, 4);
//! ```

pub mod parser;
pub mod types;

pub use parser::{parse_message, ParseError, ParseResult, RespParser};
pub use types::RespValue;
