use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "activity-lens", version, about = "Webcam activity classification server")]
struct Cli {
    /// JSON config file; missing files fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Listen address, e.g. 0.0.0.0:5000
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    activity_lens_lib::run(activity_lens_lib::RunOptions {
        config_path: cli.config,
        bind_addr: cli.bind,
    })
    .await
}
