use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "focus-cycle", version, about = "Run focus cycles from the terminal")]
struct Args {
    /// Settings file; defaults apply while it does not exist.
    #[arg(long, default_value = "focus-cycle.json")]
    settings: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    focus_cycle_lib::run(args.settings).await
}
