//! CLI command handlers, one per file.

mod checksum;
mod module_name;
mod sync;
mod target_path;

pub use checksum::run_checksum;
pub use module_name::run_module_name;
pub use sync::{run_sync, SyncArgs};
pub use target_path::run_target_path;
