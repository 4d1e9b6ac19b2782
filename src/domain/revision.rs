use std::num::NonZeroUsize;

use crate::error::{AppError, AppResult};

const COUNT_GUIDANCE: &str = "Please provide an int that represents the number of svn log entries to recall.\nUse --help for more info.";

/// One entry of the revision history, as handed over by the history source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionEntry {
    pub revision: String,
    pub author: String,
    pub date: String,
    pub message: String,
}

impl RevisionEntry {
    pub fn new(
        revision: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            revision: revision.into(),
            author: author.into(),
            date: date.into(),
            message: message.into(),
        }
    }

    /// Calendar date of the entry, with the time of day dropped.
    pub fn display_date(&self) -> &str {
        display_date(&self.date)
    }
}

pub fn display_date(timestamp: &str) -> &str {
    timestamp
        .split_once('T')
        .map(|(date, _)| date)
        .unwrap_or(timestamp)
}

/// How much history to request from the history source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLimit {
    All,
    Last(NonZeroUsize),
}

impl EntryLimit {
    pub fn from_count(count: Option<NonZeroUsize>) -> Self {
        count.map(EntryLimit::Last).unwrap_or(EntryLimit::All)
    }

    pub fn parse_count(value: &str) -> AppResult<NonZeroUsize> {
        value
            .trim()
            .parse::<NonZeroUsize>()
            .map_err(|_| AppError::Usage(COUNT_GUIDANCE.to_string()))
    }
}
