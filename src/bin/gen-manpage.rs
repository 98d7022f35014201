//! Man page generator for memslot
//!
//! Writes `memslot.1` plus one page per subcommand (`memslot-detect.1`, ...).
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
mod cli;

fn render(man: clap_mangen::Man, path: &Path) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(path, buffer)?;
    println!("Man page generated at: {}", path.display());
    Ok(())
}

fn main() -> std::io::Result<()> {
    // Default to ./man directory
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));

    fs::create_dir_all(&output_dir)?;

    let cmd = cli::Cli::command();
    for sub in cmd.get_subcommands() {
        let name = format!("memslot-{}", sub.get_name());
        let man = clap_mangen::Man::new(sub.clone()).title(name.to_uppercase());
        render(man, &output_dir.join(format!("{}.1", name)))?;
    }
    render(clap_mangen::Man::new(cmd), &output_dir.join("memslot.1"))?;

    println!("\nTo view the man page:");
    println!("  man -l {}", output_dir.join("memslot.1").display());

    Ok(())
}
