//! gig-radar
//!
//! Looks up who a SoundCloud user follows and prints upcoming Songkick gigs
//! for any of them that match an artist.

mod driver;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gig_core::config::parse_concurrency;
use gig_core::{Config, Error, SongkickClient, SoundcloudClient};
use gig_fanout::{FanOut, FanOutConfig};

use crate::driver::{RunOptions, RunOutcome};

#[derive(Debug, Parser)]
#[command(name = "gig-radar", version, about)]
struct Cli {
    /// SoundCloud handle of the user whose followings are checked
    username: String,

    /// Cap on concurrent directory lookups (0 = unbounded)
    #[arg(long, value_name = "N")]
    max_concurrency: Option<String>,

    /// Print failed lookups to stderr after the run
    #[arg(long)]
    report_failures: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays one event per line
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e @ Error::MissingCredential { .. }) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(raw) = &cli.max_concurrency {
        config.max_concurrency = parse_concurrency(raw)?;
    }

    tracing::debug!(
        "Songkick at {}, SoundCloud at {}, max concurrency {:?}",
        config.songkick.base_url,
        config.soundcloud.base_url,
        config.max_concurrency
    );

    let soundcloud = SoundcloudClient::new(config.soundcloud.clone(), &config.http)?;
    let songkick = SongkickClient::new(config.songkick.clone(), &config.http)?;
    let fanout = FanOut::new(
        Arc::new(songkick),
        FanOutConfig::default().with_max_concurrency(config.max_concurrency),
    );

    let options = RunOptions {
        report_failures: cli.report_failures,
    };
    let mut stdout = std::io::stdout();

    let outcome = driver::run(&soundcloud, &fanout, &cli.username, &options, &mut stdout).await?;
    if let RunOutcome::Completed {
        printed,
        summary: Some(summary),
    } = outcome
    {
        tracing::info!(
            "Printed {} events ({} failed lookups, run {})",
            printed,
            summary.failed,
            summary.run_id
        );
    }

    Ok(())
}
