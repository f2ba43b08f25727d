//! Line-oriented control commands for a running recorder.
//!
//! ```text
//! pause              stop any clip and suspend polling
//! resume             resume with an empty pre-roll
//! threshold <n>      set the trigger threshold (silence follows at n/2)
//! max-clip <secs>    set the per-clip cap
//! status             print a JSON status snapshot
//! quit               finish the current clip and exit
//! ```

use std::str::FromStr;

use sound_trigger_core::{ClipStorage, Clock, Recorder, SampleSource};

use crate::error::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    Threshold(u32),
    MaxClip(u32),
    Status,
    Quit,
}

impl FromStr for Command {
    type Err = HostError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| HostError::BadCommand("empty command".into()))?
            .to_ascii_lowercase();
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(HostError::BadCommand(format!("unexpected argument '{}'", extra)));
        }

        let command = match (name.as_str(), arg) {
            ("pause", None) => Command::Pause,
            ("resume", None) => Command::Resume,
            ("status", None) => Command::Status,
            ("quit" | "exit", None) => Command::Quit,
            ("threshold", Some(value)) => Command::Threshold(parse_number(&name, value)?),
            ("max-clip", Some(value)) => Command::MaxClip(parse_number(&name, value)?),
            ("threshold" | "max-clip", None) => {
                return Err(HostError::BadCommand(format!("{} needs a value", name)));
            }
            (_, _) => return Err(HostError::BadCommand(format!("unknown command '{}'", line.trim()))),
        };
        Ok(command)
    }
}

fn parse_number(name: &str, value: &str) -> Result<u32, HostError> {
    value
        .parse()
        .map_err(|_| HostError::BadCommand(format!("{} expects a whole number, got '{}'", name, value)))
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, HostError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    line.parse().map(Some)
}

/// Apply a command and return the reply to show the operator.
///
/// `Quit` is acknowledged only; the caller owns the poll loop and shuts the
/// recorder down itself.
pub fn apply<S, C, F>(recorder: &mut Recorder<S, C, F>, command: Command) -> String
where
    S: SampleSource,
    C: Clock,
    F: ClipStorage,
{
    match command {
        Command::Pause => {
            recorder.pause();
            "paused".into()
        }
        Command::Resume => {
            recorder.resume();
            if recorder.is_shut_down() {
                "recorder is shut down".into()
            } else {
                "resumed".into()
            }
        }
        Command::Threshold(value) => {
            let applied = recorder.set_threshold(value);
            format!("threshold {} (silence {})", applied, recorder.silence_threshold())
        }
        Command::MaxClip(secs) => format!("max clip {} s", recorder.set_max_clip_secs(secs)),
        Command::Status => serde_json::to_string(&recorder.status())
            .unwrap_or_else(|e| format!("status unavailable: {}", e)),
        Command::Quit => "quitting".into(),
    }
}
