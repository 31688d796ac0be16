use appmon_btxt::{document, read::decode, BtxtOptions};
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::PathBuf,
};
use tracing::info;

use super::{btxt_path, document_path, SharedArgs};

#[derive(Args)]
pub struct ReadArgs {
    /// An input BTXT file
    #[arg(short, long, value_name = "FILE", value_parser = btxt_path)]
    btxt: PathBuf,

    /// A target document
    #[arg(short = 'x', long, value_name = "FILE", value_parser = document_path)]
    document: PathBuf,

    #[command(flatten)]
    shared: SharedArgs,
}

impl ReadArgs {
    pub fn handle(&self) -> Result<()> {
        info!("reading {}", self.btxt.display());

        let f = File::open(&self.btxt)
            .into_diagnostic()
            .context(format!("path: {}", self.btxt.display()))?;

        let options = BtxtOptions::builder()
            .escape_newlines(self.shared.escape_newlines)
            .build();
        let btxt = decode(BufReader::new(f), &options)
            .context(format!("decoding {}", self.btxt.display()))?;

        info!(
            labels = btxt.label_count,
            strings = btxt.string_count,
            "writing {}",
            self.document.display()
        );

        self.shared.persist(&self.document, |out| {
            document::to_writer(&btxt, BufWriter::new(out))
                .context(format!("writing {}", self.document.display()))?;
            Ok(())
        })?;

        Ok(())
    }
}
