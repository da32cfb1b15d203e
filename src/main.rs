mod csv;
mod models;
mod report;
mod run;
mod store;
mod util;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = get_data_dir()?;
    let backend = store::persist::FileBackend::new(data_dir);
    let mut store = store::Store::open(Box::new(backend));
    run::as_cli(&args, &mut store)
}

fn get_data_dir() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "tally", "Tally")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.to_path_buf())
}
