use std::process::ExitCode;

use anyhow::{Context, Result};
use zipward_archive::{
    Compression, DuplicatePolicy, UnzipOptions, ZipOptions, unzip_with_options,
    zip_source_with_options,
};
use zipward_fs::{FileSystem, copy_directory_contents, exists_and_is_file, file_exists};

use super::app::{Commands, CopyArg, ExistsArg, UnzipArg, ZipArg};

pub fn run<F: FileSystem + ?Sized>(fs: &F, cmd: Commands) -> Result<ExitCode> {
    match cmd {
        Commands::Exists(arg) => Ok(exists(fs, arg)),
        Commands::Copy(arg) => copy(fs, arg),
        Commands::Zip(arg) => zip(fs, arg),
        Commands::Unzip(arg) => unzip(fs, arg),
    }
}

fn exists<F: FileSystem + ?Sized>(fs: &F, arg: ExistsArg) -> ExitCode {
    let found = if arg.dir_ok {
        file_exists(fs, &arg.path)
    } else {
        exists_and_is_file(fs, &arg.path)
    };
    if found { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn copy<F: FileSystem + ?Sized>(fs: &F, arg: CopyArg) -> Result<ExitCode> {
    let report = copy_directory_contents(fs, &arg.source, &arg.destination).with_context(|| {
        format!(
            "copying {} into {}",
            arg.source.display(),
            arg.destination.display()
        )
    })?;
    println!(
        "copied {} files ({} bytes), created {} directories",
        report.files_copied, report.bytes_copied, report.dirs_created
    );
    Ok(ExitCode::SUCCESS)
}

fn zip<F: FileSystem + ?Sized>(fs: &F, arg: ZipArg) -> Result<ExitCode> {
    let mut options = ZipOptions::new();
    if arg.store {
        options = options.compression(Compression::Stored);
    }
    let report = zip_source_with_options(
        fs,
        &arg.source,
        &arg.target,
        arg.skip_containing_folder,
        &options,
    )
    .with_context(|| format!("zipping {}", arg.source.display()))?;
    println!(
        "wrote {} ({} files, {} directories, {} bytes)",
        arg.target.display(),
        report.files,
        report.directories,
        report.bytes
    );
    Ok(ExitCode::SUCCESS)
}

fn unzip<F: FileSystem + ?Sized>(fs: &F, arg: UnzipArg) -> Result<ExitCode> {
    let mut options = UnzipOptions::new();
    for prefix in arg.skip_prefixes {
        options = options.skip_prefix(prefix);
    }
    if arg.reject_duplicates {
        options = options.duplicates(DuplicatePolicy::Reject);
    }
    let report = unzip_with_options(fs, &arg.archive, &arg.destination, &arg.scope, &options)
        .with_context(|| format!("extracting {}", arg.archive.display()))?;
    println!(
        "extracted {} entries ({} bytes) into {}, skipped {}",
        report.entry_count(),
        report.total_bytes,
        arg.destination.display(),
        report.skipped
    );
    Ok(ExitCode::SUCCESS)
}
