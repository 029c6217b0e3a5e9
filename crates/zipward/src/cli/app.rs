use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(name = "zipward", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "e", name = "exists", about = "Exit 0 if the path is a regular file")]
    Exists(ExistsArg),
    #[command(alias = "cp", name = "copy", about = "Copy a directory's contents into another")]
    Copy(CopyArg),
    #[command(alias = "z", name = "zip", about = "Create a zip archive")]
    Zip(ZipArg),
    #[command(alias = "x", name = "unzip", about = "Extract a zip archive through a staging directory")]
    Unzip(UnzipArg),
}

#[derive(Clone, Debug, Args)]
pub struct ExistsArg {
    pub path: PathBuf,
    /// Accept directories as well as files.
    #[arg(long)]
    pub dir_ok: bool,
}

#[derive(Clone, Debug, Args)]
pub struct CopyArg {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ZipArg {
    pub source: PathBuf,
    pub target: PathBuf,
    /// Store the contents of SOURCE at the archive root instead of under its folder name.
    #[arg(long)]
    pub skip_containing_folder: bool,
    /// Store files without compression.
    #[arg(long)]
    pub store: bool,
}

#[derive(Clone, Debug, Args)]
pub struct UnzipArg {
    pub archive: PathBuf,
    pub destination: PathBuf,
    /// Label for the staging directory and log lines.
    #[arg(long, default_value = "zipward")]
    pub scope: String,
    /// Fail when two entries resolve to the same path.
    #[arg(long)]
    pub reject_duplicates: bool,
    /// Additional entry-name prefixes to skip (`__MACOSX` is always skipped).
    #[arg(long = "skip-prefix", value_name = "PREFIX")]
    pub skip_prefixes: Vec<String>,
}
