//! CLI command implementations
//!
//! Each command lives in its own submodule and takes an options struct.

pub mod build;
pub mod check;
pub mod init;
pub mod output;
pub mod serve;

pub use build::{execute_build, BuildOptions};
pub use check::{execute_check, CheckOptions};
pub use init::{execute_init, InitOptions};
pub use output::{print_summary, print_warnings};
pub use serve::{execute_serve, ServeOptions, ServeSource};
