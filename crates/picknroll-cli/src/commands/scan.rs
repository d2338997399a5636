use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use picknroll_core::candidates::has_image_ext;
use picknroll_core::io::fs::scan_files;
use picknroll_core::FileHandle;

use super::config::load_config;

#[derive(Args)]
pub struct ScanArgs {
    /// Files or directories to scan
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print every candidate path
    #[arg(long)]
    pub list: bool,
}

pub fn run(args: &ScanArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let files = scan_files(&args.paths);
    let candidates: Vec<_> = files
        .iter()
        .filter(|f| has_image_ext(f.name(), config.image_extensions.as_slice()))
        .collect();

    println!("Files:       {}", files.len());
    println!("Candidates:  {}", candidates.len());
    println!("Extensions:  {}", config.image_extensions.join(", "));

    if args.list {
        println!();
        for file in &candidates {
            println!("  {}", file.full_path());
        }
    }

    Ok(())
}
