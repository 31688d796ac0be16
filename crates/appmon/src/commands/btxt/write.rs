use appmon_btxt::{document, write::encode_to_vec, BtxtOptions};
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::PathBuf,
};
use tracing::info;

use super::{btxt_path, document_path, SharedArgs};

#[derive(Args)]
pub struct WriteArgs {
    /// An input document
    #[arg(short = 'x', long, value_name = "FILE", value_parser = document_path)]
    document: PathBuf,

    /// A target BTXT file
    #[arg(short, long, value_name = "FILE", value_parser = btxt_path)]
    btxt: PathBuf,

    /// Write string identifiers even when they don't run 0, 1, 2... inside a label
    #[arg(long, default_value_t = false)]
    allow_sparse_ids: bool,

    #[command(flatten)]
    shared: SharedArgs,
}

impl WriteArgs {
    pub fn handle(&self) -> Result<()> {
        info!("reading {}", self.document.display());

        let f = File::open(&self.document)
            .into_diagnostic()
            .context(format!("path: {}", self.document.display()))?;
        let btxt = document::from_reader(BufReader::new(f))
            .context(format!("parsing {}", self.document.display()))?;

        let options = BtxtOptions::builder()
            .escape_newlines(self.shared.escape_newlines)
            .check_identifiers(!self.allow_sparse_ids)
            .build();
        let data = encode_to_vec(&btxt, &options)
            .context(format!("encoding {}", self.document.display()))?;

        info!(
            labels = btxt.label_count,
            strings = btxt.string_count,
            "writing {}",
            self.btxt.display()
        );

        self.shared.persist(&self.btxt, |out| {
            out.write_all(&data)
                .into_diagnostic()
                .context(format!("writing {}", self.btxt.display()))
        })?;

        Ok(())
    }
}
