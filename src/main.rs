use anyhow::{Context, Result};
use bubbletea_rs::{MouseMotion, Program};
use clap::Parser;
use quotedown::app::{self, App};
use quotedown::config::{self, Settings};

#[derive(Parser, Debug)]
#[command(name = "quotedown")]
#[command(about = "Countdown to a target instant, with motivational quote popups")]
#[command(version)]
struct Args {
    /// Target instant, RFC3339 (e.g. 2025-09-06T20:58:00-06:00)
    #[arg(long)]
    end_date: Option<String>,

    /// Base64-encoded, comma-separated motivational quotes
    #[arg(long)]
    motivation: Option<String>,

    /// Print the encoded payload for a comma-separated quote list and exit
    #[arg(long, value_name = "TEXT")]
    encode_motivation: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(text) = args.encode_motivation {
        println!("{}", config::encode_quotes(&config::split_quotes(&text)));
        return Ok(());
    }

    app::set_settings(Settings::resolve(
        args.end_date.as_deref(),
        args.motivation.as_deref(),
    ));

    let program = Program::<App>::builder()
        .alt_screen(true)
        .mouse_motion(MouseMotion::Cell)
        .signal_handler(true)
        .build()
        .context("building the terminal program")?;
    program.run().await.context("running the terminal program")?;
    Ok(())
}
