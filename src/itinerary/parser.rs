//! Best-effort parsing of model-written Markdown into day plans

use thiserror::Error;
use tracing::debug;

use crate::models::{DateRange, DayPlan};

/// Why a model reply could not be split into days
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DayParseError {
    #[error("expected {expected} day sections, found {found}")]
    DayCount { expected: u32, found: usize },

    #[error("section {position} is headed '{heading}' instead of Day {position}")]
    Heading { position: u32, heading: String },

    #[error("day {day} lists no activities")]
    NoActivities { day: u32 },
}

struct Section<'a> {
    heading: &'a str,
    body: Vec<&'a str>,
}

/// Split `text` on level-2 headings; anything before the first one is dropped
fn sections(text: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(heading) = trimmed.strip_prefix("## ") {
            sections.push(Section {
                heading: heading.trim(),
                body: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.body.push(line);
        }
    }
    sections
}

/// Read `Day k` out of a heading, returning `k` and the remaining title
fn day_heading(heading: &str) -> Option<(u32, Option<String>)> {
    // ASCII lowercasing keeps byte offsets valid for `heading`
    let lower = heading.to_ascii_lowercase();
    let (after, digits_len) = lower.match_indices("day").find_map(|(start, _)| {
        let after = heading[start + 3..].trim_start();
        let digits_len = after.chars().take_while(char::is_ascii_digit).count();
        (digits_len > 0).then_some((after, digits_len))
    })?;
    let number = after[..digits_len].parse().ok()?;

    let title = after[digits_len..]
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '–' | '—' | '*' | ')'))
        .trim_end_matches(|c: char| c.is_whitespace() || c == '*')
        .trim();
    let title = (!title.is_empty()).then(|| title.to_string());
    Some((number, title))
}

/// Activity text of a bullet or numbered list line
fn bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let rest = ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .or_else(|| {
            let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
            (digits > 0)
                .then(|| trimmed[digits..].strip_prefix(". "))
                .flatten()
        })?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

/// Parse `text` into exactly one plan per day of `range`.
///
/// Level-2 sections that are not `Day k` headings (tips, packing lists) are
/// skipped; the day sections themselves must run 1..=N in order.
pub fn parse_days(text: &str, range: &DateRange) -> Result<Vec<DayPlan>, DayParseError> {
    let days: Vec<(u32, Option<String>, Section<'_>)> = sections(text)
        .into_iter()
        .filter_map(|section| match day_heading(section.heading) {
            Some((number, title)) => Some((number, title, section)),
            None => {
                debug!(heading = section.heading, "Skipping non-day section");
                None
            }
        })
        .collect();

    let expected = range.num_days();
    if days.len() != expected as usize {
        return Err(DayParseError::DayCount {
            expected,
            found: days.len(),
        });
    }

    days.into_iter()
        .zip(range.days())
        .zip(1..)
        .map(|(((number, title, section), date), position)| {
            if number != position {
                return Err(DayParseError::Heading {
                    position,
                    heading: section.heading.to_string(),
                });
            }
            let activities: Vec<String> = section
                .body
                .iter()
                .filter_map(|line| bullet(line))
                .map(str::to_string)
                .collect();
            if activities.is_empty() {
                return Err(DayParseError::NoActivities { day: position });
            }
            Ok(DayPlan {
                date,
                title,
                activities,
            })
        })
        .collect()
}
