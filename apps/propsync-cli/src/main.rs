//! propsync - reconcile a property workbook against the directory service.

use clap::Parser;

use propsync_cli::cli::Cli;
use propsync_cli::commands;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    match commands::process::execute(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}
