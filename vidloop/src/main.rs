/*!
    Video Loop

    Plays a continuous stream of videos from a paginated backend API in
    several display slots at once. Each slot takes the next listed video,
    resolves its playback URL, plays it in an external player, and deletes
    the server record of the video it just replaced.

    Usage:
      vidloop play --base-url https://example.com/compilations/api/ --csrf-token TOKEN
      vidloop --page https://example.com/compilations/ --dry-run 5
      vidloop list --base-url https://example.com/compilations/api/ --limit 20

    `play` is the default subcommand; its flags work without naming it.
    Logging is configured with `VIDLOOP_LOG` (default `info`).
*/

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod cli;
mod display;
mod host_page;
mod slot;
mod source;

#[cfg(test)]
mod testing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VIDLOOP_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    cli::Args::parse().run().await
}
