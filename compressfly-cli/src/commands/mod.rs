//! Command implementations for the compressFly CLI.

pub mod compress;
pub mod decompress;
pub mod maintain;
pub mod validate;
pub mod view;

pub use compress::{CompressOptions, cmd_compress};
pub use decompress::{DecompressOptions, cmd_decompress};
pub use maintain::{cmd_remove, cmd_update};
pub use validate::cmd_validate;
pub use view::{ViewOptions, cmd_view};

/// Result of a CLI command.
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Exit code used when a batch reported invalid archives.
pub const EXIT_INVALID_ARCHIVES: i32 = 2;
