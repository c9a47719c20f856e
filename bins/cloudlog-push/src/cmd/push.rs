use std::io::BufRead;

use cloudlog::{CloudLog, Event};

use crate::config::{PushArgs, PushConfig};
use crate::error::PushError;

pub fn run(args: PushArgs) -> Result<(), PushError> {
    let config = PushConfig::load(&args.config)?;
    tracing::debug!(config = %args.config, "loaded config");

    let lines = if args.events.is_empty() {
        read_lines(std::io::stdin().lock())?
    } else {
        args.events
    };
    let events = parse_events(&lines, args.json)?;
    if events.is_empty() {
        tracing::info!("no events to push");
        return Ok(());
    }

    let client_config = config.client_config();
    let transport = super::build_transport(config.transport)?;
    let client = CloudLog::with_config(transport, client_config);

    let count = events.len();
    client.push_events(events)?;
    tracing::info!(events = count, client_type = %client.client_type(), "events pushed");

    client.close()?;
    Ok(())
}

/// Non-blank lines of `reader`, trailing whitespace removed.
pub fn read_lines(reader: impl BufRead) -> Result<Vec<String>, PushError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

/// Text events as-is, or JSON documents converted to events.
pub fn parse_events(lines: &[String], json: bool) -> Result<Vec<Event>, PushError> {
    if !json {
        return Ok(lines.iter().map(Event::from).collect());
    }
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str::<serde_json::Value>(line)
                .map(Event::from)
                .map_err(|source| PushError::Json { line: i + 1, source })
        })
        .collect()
}
