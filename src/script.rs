// ABOUTME: Replay script parsing for the big-deck application
// ABOUTME: Reads timestamped synthetic input events used to drive a deck headlessly

use crate::document::ElementId;
use crate::errors::{DeckError, Result};
use crate::input::{InputEvent, Key, Point};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    /// Virtual time the events are delivered at.
    pub at: Duration,
    /// Line number in the script, for reporting.
    pub line: usize,
    /// Events to deliver; empty for `wait`.
    pub events: Vec<InputEvent>,
}

/// Load and parse a replay script file.
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(DeckError::FileReadError)?;
    parse_script(&content)
}

/// Parse a replay script.
///
/// Each line is `<at-ms> <event> <args...>`. Blank lines and lines starting
/// with `#` are skipped, and timestamps may not go backwards.
pub fn parse_script(content: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    let mut last = Duration::ZERO;

    for (number, raw) in content.lines().enumerate() {
        let line = number + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut words = trimmed.split_whitespace();
        let at_ms: u64 = parse_arg(words.next(), line, "timestamp")?;
        let at = Duration::from_millis(at_ms);
        if at < last {
            return Err(script_error(
                line,
                format!("timestamp {}ms is earlier than the previous step", at_ms),
            ));
        }
        last = at;

        let name = words
            .next()
            .ok_or_else(|| script_error(line, "missing event name".to_string()))?;
        let args: Vec<&str> = words.collect();
        let events = parse_event(name, &args, line)?;
        steps.push(ScriptStep { at, line, events });
    }

    Ok(steps)
}

fn parse_event(name: &str, args: &[&str], line: usize) -> Result<Vec<InputEvent>> {
    let arg = |i: usize| args.get(i).copied();

    let events = match name {
        "key" => {
            expect_args(args, 1, line, name)?;
            // Scripts cannot carry a bare space, so `Space` names the space bar
            vec![InputEvent::Key(Key::from_dom(args[0]))]
        }
        "wheel" => {
            expect_args(args, 1, line, name)?;
            vec![InputEvent::Wheel {
                delta_y: parse_arg(arg(0), line, "deltaY")?,
            }]
        }
        "swipe" => {
            expect_args(args, 4, line, name)?;
            vec![
                InputEvent::TouchStart(Point::new(
                    parse_arg(arg(0), line, "x0")?,
                    parse_arg(arg(1), line, "y0")?,
                )),
                InputEvent::TouchEnd(Point::new(
                    parse_arg(arg(2), line, "x1")?,
                    parse_arg(arg(3), line, "y1")?,
                )),
            ]
        }
        "touchstart" | "touchend" => {
            expect_args(args, 2, line, name)?;
            let point = Point::new(parse_arg(arg(0), line, "x")?, parse_arg(arg(1), line, "y")?);
            if name == "touchstart" {
                vec![InputEvent::TouchStart(point)]
            } else {
                vec![InputEvent::TouchEnd(point)]
            }
        }
        "dot" => {
            expect_args(args, 1, line, name)?;
            vec![InputEvent::DotClick(parse_arg(arg(0), line, "dot index")?)]
        }
        "hash" => {
            expect_args(args, 1, line, name)?;
            vec![InputEvent::HashChange(
                args[0].trim_start_matches('#').to_string(),
            )]
        }
        "quiz" => {
            expect_args(args, 2, line, name)?;
            vec![InputEvent::QuizClick {
                slide: parse_arg(arg(0), line, "slide")?,
                option: parse_arg(arg(1), line, "option")?,
            }]
        }
        "reveal" => {
            expect_args(args, 3, line, name)?;
            vec![InputEvent::Intersection {
                element: ElementId {
                    slide: parse_arg(arg(0), line, "slide")?,
                    index: parse_arg(arg(1), line, "element")?,
                },
                ratio: parse_arg(arg(2), line, "ratio")?,
            }]
        }
        "wait" => {
            expect_args(args, 0, line, name)?;
            Vec::new()
        }
        other => {
            return Err(script_error(line, format!("unknown event {:?}", other)));
        }
    };

    Ok(events)
}

fn expect_args(args: &[&str], count: usize, line: usize, name: &str) -> Result<()> {
    if args.len() != count {
        return Err(script_error(
            line,
            format!("{} takes {} argument(s), got {}", name, count, args.len()),
        ));
    }
    Ok(())
}

fn parse_arg<T: FromStr>(value: Option<&str>, line: usize, what: &str) -> Result<T> {
    let value = value.ok_or_else(|| script_error(line, format!("missing {}", what)))?;
    value
        .parse::<T>()
        .map_err(|_| script_error(line, format!("invalid {}: {:?}", what, value)))
}

fn script_error(line: usize, message: String) -> DeckError {
    DeckError::ScriptError { line, message }
}
