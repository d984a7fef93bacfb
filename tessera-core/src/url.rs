//! Date placeholder substitution for source URLs.
//!
//! `{YYYY}`, `{MM}` and `{DD}` expand to the zero-padded local date, so feed
//! endpoints can embed the query date in their path or query string. With no
//! wall clock available the URL passes through untouched.

use core::fmt::Write;

use heapless::String;
use tessera_protocol::config::MAX_URL;

use crate::clock::LocalTime;

/// Expand date placeholders in `url`
///
/// Placeholders always expand to fewer bytes than they occupy, so the result
/// fits any input that fits the URL capacity.
pub fn fill_date_placeholders(url: &str, time: Option<&LocalTime>) -> String<MAX_URL> {
    let mut out = String::new();
    let Some(t) = time else {
        let _ = out.push_str(url);
        return out;
    };

    let mut rest = url;
    while let Some(pos) = rest.find('{') {
        let _ = out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{YYYY}") {
            let _ = write!(out, "{:04}", t.year);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{MM}") {
            let _ = write!(out, "{:02}", t.month);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{DD}") {
            let _ = write!(out, "{:02}", t.day);
            rest = after;
        } else {
            let _ = out.push('{');
            rest = &tail[1..];
        }
    }
    let _ = out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aug_6() -> LocalTime {
        LocalTime {
            year: 2026,
            month: 8,
            day: 6,
            weekday: 4,
            hour: 12,
            minute: 0,
            second: 0,
        }
    }

    #[test]
    fn all_placeholders_expand() {
        let out = fill_date_placeholders(
            "http://feed.local/day/{YYYY}-{MM}-{DD}.json",
            Some(&aug_6()),
        );
        assert_eq!(out.as_str(), "http://feed.local/day/2026-08-06.json");
    }

    #[test]
    fn unknown_braces_pass_through() {
        let out = fill_date_placeholders("http://x/{query}/{DD}", Some(&aug_6()));
        assert_eq!(out.as_str(), "http://x/{query}/06");
    }

    #[test]
    fn no_clock_passes_url_through() {
        let out = fill_date_placeholders("http://x/{YYYY}", None);
        assert_eq!(out.as_str(), "http://x/{YYYY}");
    }

    #[test]
    fn plain_url_is_unchanged() {
        let out = fill_date_placeholders("http://prom/api/v1/query?query=up", Some(&aug_6()));
        assert_eq!(out.as_str(), "http://prom/api/v1/query?query=up");
    }
}
