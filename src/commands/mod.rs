//! Embedded command protocol: detection and extraction of `%%OS{...}%%`
//! blocks from streamed assistant text.
//!
//! # Module structure
//! - `scanner` - character-level block scanner (`ScanState`, `find_block`)
//! - `block` - `CommandBlock` and the args extraction rule
//! - `interceptor` - batch interception over content fragments

mod block;
mod interceptor;
mod scanner;

pub use block::CommandBlock;
pub use interceptor::{intercept, InterceptOutcome};
pub use scanner::{find_block, BlockScan, ScanState, BLOCK_CLOSE, BLOCK_OPEN};
