use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use tokio::signal;

use crate::api::VideoApi;
use crate::app::{App, region_name};
use crate::display::{CommandDisplay, DryRunDisplay, PlayerCommand, Surface};
use crate::slot::{SlotError, SlotReport};

use super::ApiArgs;

#[derive(Parser, Debug)]
pub struct PlayCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Number of display slots drawing from the listing
    #[arg(short = 'n', long, default_value = "2")]
    pub slots: usize,

    /// Milliseconds between polls while the listing is momentarily empty
    #[arg(long, default_value = "2000")]
    pub poll_interval_ms: u64,

    /// Player command line; `{url}` is replaced with the media URL
    #[arg(long, default_value = "ffplay -autoexit -loglevel error {url}")]
    pub player: String,

    /// Play nothing; treat each video as finished after this many seconds
    #[arg(long, value_name = "SECS")]
    pub dry_run: Option<u64>,
}

impl Default for PlayCommand {
    fn default() -> Self {
        Self {
            api: ApiArgs::default(),
            slots: 2,
            poll_interval_ms: 2000,
            player: "ffplay -autoexit -loglevel error {url}".to_string(),
            dry_run: None,
        }
    }
}

impl PlayCommand {
    pub async fn run(self) -> Result<()> {
        if self.slots == 0 {
            bail!("at least one slot is required");
        }
        let player = PlayerCommand::parse(&self.player)
            .ok_or_else(|| anyhow!("empty player command"))?;

        let api = Arc::new(self.api.connect().await?);
        let app = App::start(api, Duration::from_millis(self.poll_interval_ms)).await?;

        match self.dry_run {
            Some(secs) => {
                let displays: Vec<DryRunDisplay> = (0..self.slots)
                    .map(|i| DryRunDisplay::new(region_name(i), Duration::from_secs(secs)))
                    .collect();
                play_until_done(&app, displays).await
            }
            None => {
                let displays: Vec<CommandDisplay> = (0..self.slots)
                    .map(|i| CommandDisplay::new(region_name(i), player.clone()))
                    .collect();
                play_until_done(&app, displays).await
            }
        }
    }
}

/// Run every slot to completion, or until Ctrl+C.
async fn play_until_done<A: VideoApi, D: Surface>(app: &App<A>, displays: Vec<D>) -> Result<()> {
    let regions: Vec<String> = displays.iter().map(|d| d.region().to_string()).collect();

    tokio::select! {
        results = app.run(displays) => summarize(&regions, results, app.source().taken()),
        interrupted = signal::ctrl_c() => {
            interrupted?;
            tracing::info!(taken = app.source().taken(), "interrupted, stopping slots");
            Ok(())
        }
    }
}

fn summarize(
    regions: &[String],
    results: Vec<Result<SlotReport, SlotError>>,
    taken: u64,
) -> Result<()> {
    let mut failed = 0;
    for (region, result) in regions.iter().zip(results) {
        match result {
            Ok(report) => tracing::info!(
                slot = %report.region,
                played = report.played,
                skipped = report.skipped,
                last = report.last.as_ref().map(|v| v.name.as_str()).unwrap_or("-"),
                "slot done"
            ),
            Err(e) => {
                failed += 1;
                tracing::error!(slot = %region, error = %e, "slot stopped");
            }
        }
    }

    tracing::info!(taken, "all slots stopped");
    if failed == regions.len() {
        bail!("every slot stopped with an error");
    }
    Ok(())
}
