use clap::Parser;
use srcview_tui::Cli;
use srcview_tui::run_main;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    run_main(cli).await
}
