pub mod btxt;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle BTXT files
    Btxt {
        #[command(subcommand)]
        command: btxt::BtxtCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Btxt { command } => command.handle(),
        }
    }
}
