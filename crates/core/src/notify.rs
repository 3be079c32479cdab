//! Loading overlay, status banners and the small text helpers the host UI
//! shares with the rest of the app.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BannerId(u64);

impl BannerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for BannerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: BannerId,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

pub struct Notifications {
    banners: Vec<Banner>,
    next_id: u64,
    timeout: Duration,
    loading: bool,
}

impl Notifications {
    pub fn new(timeout: Duration) -> Self {
        Self {
            banners: Vec::new(),
            next_id: 0,
            timeout,
            loading: false,
        }
    }

    /// Shows a dismissible banner that disappears on its own after the
    /// configured timeout.
    pub fn show_alert(&mut self, message: impl Into<String>, severity: Severity) -> BannerId {
        let message = message.into();
        match severity {
            Severity::Danger | Severity::Warning => warn!(%severity, "{message}"),
            Severity::Success | Severity::Info => info!(%severity, "{message}"),
        }

        let id = BannerId(self.next_id);
        self.next_id += 1;
        self.banners.push(Banner {
            id,
            message,
            severity,
            expires_at: Instant::now() + self.timeout,
        });
        id
    }

    pub fn dismiss(&mut self, id: BannerId) -> bool {
        let before = self.banners.len();
        self.banners.retain(|banner| banner.id != id);
        before != self.banners.len()
    }

    /// Drops expired banners and returns the ones still on screen, oldest
    /// first.
    pub fn visible_banners(&mut self, now: Instant) -> &[Banner] {
        self.banners.retain(|banner| banner.expires_at > now);
        &self.banners
    }

    pub fn show_loading(&mut self) {
        debug!("showing loading overlay");
        self.loading = true;
    }

    pub fn hide_loading(&mut self) {
        debug!("hiding loading overlay");
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Long US-English date, e.g. `March 5, 2024`. Accepts a plain ISO date or
/// an RFC 3339 / ISO date-time.
pub fn format_date(input: &str) -> String {
    let input = input.trim();
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|d| d.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|d| d.date())
        });

    match date {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => "Invalid Date".to_owned(),
    }
}

/// Escapes text so it can be embedded in HTML as a text node.
pub fn sanitize_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            c => escaped.push(c),
        }
    }
    escaped
}
