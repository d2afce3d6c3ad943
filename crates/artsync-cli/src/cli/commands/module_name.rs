use anyhow::Result;
use artsync_core::build_info;
use std::path::Path;

/// Print the module path from `<dir>/go.mod`.
pub fn run_module_name(dir: &Path) -> Result<()> {
    println!("{}", build_info::read_go_module_name(dir)?);
    Ok(())
}
