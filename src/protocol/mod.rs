//! Protocol Module
//!
//! The wire protocol spoken to the store server: RESP2.
//!
//! ## Request Format
//! Every command is an array of bulk strings:
//! ```text
//! *3\r\n $3\r\nSET\r\n $3\r\n123\r\n $45\r\n{"id":...}\r\n
//! ```
//!
//! ## Reply Types (first byte)
//! - `+` simple string   `+OK\r\n`
//! - `-` error           `-ERR unknown command\r\n`
//! - `:` integer         `:1\r\n`
//! - `$` bulk string     `$5\r\nhello\r\n`, null as `$-1\r\n`
//! - `*` array           `*2\r\n...`, null as `*-1\r\n`

mod command;
mod frame;
mod codec;

pub use command::Command;
pub use frame::Frame;
pub use codec::{
    decode_frame, encode_command, encode_frame, read_frame, write_command, write_frame,
    MAX_BULK_SIZE,
};
