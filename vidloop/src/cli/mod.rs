use anyhow::Result;
use clap::{Parser, Subcommand};

mod connect;
mod list;
mod play;

pub use connect::ApiArgs;
pub use list::ListCommand;
pub use play::PlayCommand;

#[derive(Parser, Debug)]
#[command(name = "vidloop")]
#[command(about = "Continuously plays videos from a paginated API, deleting them as they finish")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for `play` when no subcommand is given
    #[command(flatten)]
    pub play: PlayCommand,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play videos in display slots until the listing runs out (default)
    Play(PlayCommand),
    /// Print the listing without playing or deleting anything
    List(ListCommand),
}

impl Args {
    pub async fn run(self) -> Result<()> {
        let command = self.command.unwrap_or(Command::Play(self.play));

        match command {
            Command::Play(cmd) => cmd.run().await,
            Command::List(cmd) => cmd.run().await,
        }
    }
}
