use std::process::Stdio;

use tokio::process::{Child, Command};
use url::Url;

use super::{DisplayError, Surface};

/// Placeholder replaced by the media URL in a player command line.
const URL_PLACEHOLDER: &str = "{url}";

/**
    Command line of an external media player, e.g. `ffplay -autoexit {url}`.

    When no argument contains `{url}`, the URL is appended as the last argument.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    /// Split a command line on whitespace. Returns `None` for an empty line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Arguments for playing `url`.
    pub fn args_for(&self, url: &Url) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(URL_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(URL_PLACEHOLDER, url.as_str())
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(url.to_string());
        }
        args
    }
}

impl Default for PlayerCommand {
    fn default() -> Self {
        Self {
            program: "ffplay".to_string(),
            args: ["-autoexit", "-loglevel", "error", URL_PLACEHOLDER]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// The element attached to a region: a source and, once playing, its process.
#[derive(Default)]
struct Element {
    source: Option<Url>,
    child: Option<Child>,
}

/**
    Display region backed by an external player process per video.

    Playing spawns the player, completion is the process exiting. Clearing
    the region kills a player that is still running.
*/
pub struct CommandDisplay {
    region: String,
    command: PlayerCommand,
    element: Option<Element>,
}

impl CommandDisplay {
    pub fn new(region: impl Into<String>, command: PlayerCommand) -> Self {
        Self {
            region: region.into(),
            command,
            element: None,
        }
    }

    fn element_mut(&mut self) -> Result<&mut Element, DisplayError> {
        let region = &self.region;
        self.element
            .as_mut()
            .ok_or_else(|| DisplayError::Detached(region.clone()))
    }
}

impl Surface for CommandDisplay {
    fn region(&self) -> &str {
        &self.region
    }

    fn clear(&mut self) {
        // Children are spawned with kill_on_drop, dropping the element stops playback.
        if let Some(element) = self.element.take()
            && element.child.is_some()
        {
            tracing::debug!(region = %self.region, "stopping player");
        }
    }

    fn attach(&mut self) {
        self.element = Some(Element::default());
    }

    fn load(&mut self, url: &Url) -> Result<(), DisplayError> {
        self.element_mut()?.source = Some(url.clone());
        Ok(())
    }

    fn source(&self) -> Option<&Url> {
        self.element.as_ref()?.source.as_ref()
    }

    async fn ready(&mut self) -> Result<(), DisplayError> {
        let region = self.region.clone();
        match self.element_mut()?.source {
            Some(_) => Ok(()),
            None => Err(DisplayError::NoSource(region)),
        }
    }

    async fn play(&mut self) -> Result<(), DisplayError> {
        let region = self.region.clone();
        let command = self.command.clone();
        let element = self.element_mut()?;
        let url = element
            .source
            .clone()
            .ok_or_else(|| DisplayError::NoSource(region.clone()))?;

        let child = Command::new(&command.program)
            .args(command.args_for(&url))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DisplayError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        tracing::info!(region = %region, %url, pid = child.id(), "player started");
        element.child = Some(child);
        Ok(())
    }

    async fn ended(&mut self) -> Result<(), DisplayError> {
        let element = self.element_mut()?;
        let Some(ref mut child) = element.child else {
            return Ok(());
        };

        let status = child
            .wait()
            .await
            .map_err(|e| DisplayError::Media(format!("failed to wait for player: {}", e)))?;
        element.child = None;

        if status.success() {
            Ok(())
        } else {
            Err(DisplayError::Media(format!("player exited with {}", status)))
        }
    }
}
