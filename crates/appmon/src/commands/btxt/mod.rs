use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

pub mod read;
pub mod write;

#[derive(clap::Subcommand)]
pub enum BtxtCommands {
    /// Convert a BTXT file into an editable document
    Read(read::ReadArgs),
    /// Convert an editable document into a BTXT file
    Write(write::WriteArgs),
}

impl BtxtCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            BtxtCommands::Read(read) => read.handle(),
            BtxtCommands::Write(write) => write.handle(),
        }
    }
}

/// Flags shared by every conversion
#[derive(Args, Debug, Clone, Copy)]
pub struct SharedArgs {
    /// Store line breaks in the BTXT file as the `\r` and `\n` escape sequences
    #[arg(long, default_value_t = false)]
    escape_newlines: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl SharedArgs {
    /// Write the target through a temporary file in the same directory and move it into place
    /// once `write` has succeeded. On failure the temporary file is removed and `path` is left
    /// as it was.
    fn persist<F>(&self, path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> Result<()>,
    {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if !self.overwrite && path.exists() {
            return Err(miette::miette!(
                help = "pass --overwrite to replace it",
                "{} already exists",
                path.display()
            ));
        }

        let mut staged = NamedTempFile::new_in(dir)
            .into_diagnostic()
            .context(format!("creating a temporary file in {}", dir.display()))?;

        write(staged.as_file_mut())?;
        staged
            .as_file()
            .sync_all()
            .into_diagnostic()
            .context(format!("writing {}", path.display()))?;

        let persisted = if self.overwrite {
            staged.persist(path)
        } else {
            staged.persist_noclobber(path)
        };
        persisted
            .map_err(|err| err.error)
            .into_diagnostic()
            .context(format!("creating {}", path.display()))?;

        Ok(())
    }
}

fn with_extension(value: &str, extension: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(extension) => Ok(path),
        _ => Err(format!("expected a .{extension} file")),
    }
}

fn btxt_path(value: &str) -> std::result::Result<PathBuf, String> {
    with_extension(value, "btxt")
}

fn document_path(value: &str) -> std::result::Result<PathBuf, String> {
    with_extension(value, "json")
}
