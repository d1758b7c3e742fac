use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use crate::source::VideoSource;

use super::ApiArgs;

#[derive(Parser, Debug)]
pub struct ListCommand {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Stop after this many videos
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Milliseconds between polls while the listing is momentarily empty
    #[arg(long, default_value = "2000")]
    pub poll_interval_ms: u64,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    pub async fn run(self) -> Result<()> {
        let api = Arc::new(self.api.connect().await?);
        let source =
            VideoSource::bootstrap(api, Duration::from_millis(self.poll_interval_ms)).await?;

        let limit = self.limit.unwrap_or(usize::MAX);
        let mut listed = 0;
        while listed < limit {
            let Some(video) = source.next().await? else {
                break;
            };
            if self.json {
                println!("{}", serde_json::to_string(&video)?);
            } else {
                println!("{}\t{}", video.name, video.guid);
            }
            listed += 1;
        }

        tracing::info!(
            listed,
            pages = source.pages_fetched(),
            "listing complete"
        );
        Ok(())
    }
}
