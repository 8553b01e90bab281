//! Domain types shared by the collector, the exporter, and the CLI.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A single collected wall post, normalized and ready for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Signed publisher id: negative for communities, positive for people.
    pub owner_id: i64,
    pub community_name: String,
    /// `"{owner_id}_{numeric_id}"`.
    pub post_id: String,
    pub published_at: DateTime<Utc>,
    pub text: String,
    pub like_count: u64,
    pub repost_count: u64,
    pub comment_count: u64,
    pub url: String,
}

impl Post {
    /// Builds the `"{owner_id}_{numeric_id}"` key used as the post id.
    #[must_use]
    pub fn key(owner_id: i64, numeric_id: i64) -> String {
        format!("{owner_id}_{numeric_id}")
    }

    /// Builds the public wall URL for a post.
    #[must_use]
    pub fn wall_url(owner_id: i64, numeric_id: i64) -> String {
        format!("https://vk.com/wall{owner_id}_{numeric_id}")
    }
}

/// Inclusive calendar-day range, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionWindow {
    date_from: NaiveDate,
    date_to: NaiveDate,
}

impl CollectionWindow {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWindow`] if `date_from` is after `date_to`.
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Result<Self, CoreError> {
        if date_from > date_to {
            return Err(CoreError::InvalidWindow {
                from: date_from,
                to: date_to,
            });
        }
        Ok(Self { date_from, date_to })
    }

    #[must_use]
    pub fn date_from(&self) -> NaiveDate {
        self.date_from
    }

    #[must_use]
    pub fn date_to(&self) -> NaiveDate {
        self.date_to
    }

    /// Start of `date_from`, 00:00:00 UTC.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.date_from.and_time(NaiveTime::MIN).and_utc()
    }

    /// End of `date_to`, 23:59:59.999999 UTC.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.date_to.and_time(NaiveTime::MIN).and_utc() + Duration::days(1)
            - Duration::microseconds(1)
    }

    /// Inclusive bounds in epoch seconds, as compared against post timestamps.
    #[must_use]
    pub fn epoch_bounds(&self) -> (i64, i64) {
        (self.start().timestamp(), self.end().timestamp())
    }
}

/// A community as typed by the user: a signed numeric id or a short name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommunityRef {
    Id(i64),
    Slug(String),
}

impl CommunityRef {
    /// Parses user input into a community reference.
    ///
    /// Accepts `-123456`, `123456`, `example_group`, and wall links such as
    /// `https://vk.com/example_group` (reduced to their last path segment).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyCommunityRef`] if nothing identifiable remains
    /// after trimming.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let candidate = if trimmed.contains("vk.com/") {
            trimmed
                .split(['?', '#'])
                .next()
                .unwrap_or(trimmed)
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
        } else {
            trimmed
        };

        if candidate.is_empty() {
            return Err(CoreError::EmptyCommunityRef);
        }

        let digits = candidate.strip_prefix('-').unwrap_or(candidate);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = candidate.parse::<i64>() {
                return Ok(Self::Id(id));
            }
        }

        Ok(Self::Slug(candidate.to_owned()))
    }
}

impl fmt::Display for CommunityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommunityRef::Id(id) => write!(f, "{id}"),
            CommunityRef::Slug(slug) => f.write_str(slug),
        }
    }
}
