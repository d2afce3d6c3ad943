use artsync_core::layout;
use std::path::Path;

pub fn run_target_path(working_dir: &Path, target_dir: &str, relative_path: &str, flat: bool) {
    let path = layout::resolve_target_path(working_dir, target_dir, relative_path, flat);
    println!("{}", path.display());
}
