//! Subject and body rendering for alert mails.
//!
//! The layout is fixed plain text. Event values are passed through as
//! received, with no trimming or escaping.

use std::fmt;

use chrono::{Local, TimeZone};
use chrono_tz::Tz;

use crate::config::MailerConfig;
use crate::event::Event;

/// Timestamp layout used in the mail body, e.g. `2023-11-14 22:13:20 +0000`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Binary classification of an event action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Resolved,
    Alert,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Resolved => "RESOLVED",
            Classification::Alert => "ALERT",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation label `<client>/<check>` used in logs and subjects.
pub fn resolve_identity(event: &Event) -> String {
    format!("{}/{}", event.client.name, event.check.name)
}

/// `resolve` maps to [`Classification::Resolved`]; every other action,
/// including unknown or empty ones, is an active alert.
pub fn classify_action(event: &Event) -> Classification {
    if event.is_resolution() {
        Classification::Resolved
    } else {
        Classification::Alert
    }
}

/// Render `[<prefix> ]<CLASSIFICATION> - <identity>: <notification>`.
pub fn render_subject(config: &MailerConfig, event: &Event) -> String {
    let prefix = match config.subject_prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => format!("{} ", prefix),
        _ => String::new(),
    };

    format!(
        "{}{} - {}: {}",
        prefix,
        classify_action(event),
        resolve_identity(event),
        event.check.notification
    )
}

/// Render the fixed plain-text body.
///
/// `timezone` selects the zone for the issued timestamp; `None` uses the
/// local system zone.
pub fn render_body(event: &Event, timezone: Option<Tz>) -> String {
    format!(
        "{output}\n\
         Host: {host}\n\
         Timestamp: {timestamp}\n\
         Address:  {address}\n\
         Check Name:  {check}\n\
         Command:  {command}\n\
         Status:  {status}\n\
         Occurrences:  {occurrences}\n",
        output = event.check.output,
        host = event.client.name,
        timestamp = format_issued(event.check.issued, timezone),
        address = event.client.address,
        check = event.check.name,
        command = event.check.command,
        status = event.check.status,
        occurrences = event.occurrences,
    )
}

/// Format Unix seconds in the given zone.
///
/// Values chrono cannot represent are rendered as the raw integer.
pub fn format_issued(issued: i64, timezone: Option<Tz>) -> String {
    let formatted = match timezone {
        Some(tz) => tz
            .timestamp_opt(issued, 0)
            .single()
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string()),
        None => Local
            .timestamp_opt(issued, 0)
            .single()
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string()),
    };

    formatted.unwrap_or_else(|| {
        tracing::warn!(issued, "Issued timestamp out of range, using raw value");
        issued.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sample_config;
    use crate::event::tests::sample_event;

    #[test]
    fn resolve_action_is_resolved() {
        let mut event = sample_event();
        event.action = "resolve".to_string();
        assert_eq!(classify_action(&event), Classification::Resolved);
        assert_eq!(classify_action(&event).to_string(), "RESOLVED");
    }

    #[test]
    fn every_other_action_is_alert() {
        let mut event = sample_event();
        for action in ["create", "flapping", "", "RESOLVE", "resolve ", "unknown"] {
            event.action = action.to_string();
            assert_eq!(
                classify_action(&event),
                Classification::Alert,
                "action {:?} should be an alert",
                action
            );
        }
    }

    #[test]
    fn identity_is_client_slash_check() {
        assert_eq!(resolve_identity(&sample_event()), "web1/disk");
    }

    #[test]
    fn identity_passes_values_through_verbatim() {
        let mut event = sample_event();
        event.client.name = " rack/web1 ".to_string();
        event.check.name = "disk/root".to_string();
        assert_eq!(resolve_identity(&event), " rack/web1 /disk/root");
    }

    #[test]
    fn subject_with_prefix() {
        let subject = render_subject(&sample_config(), &sample_event());
        assert_eq!(subject, "[PROD] ALERT - web1/disk: Disk critical");
    }

    #[test]
    fn subject_without_prefix_has_no_leading_space() {
        let mut config = sample_config();
        config.subject_prefix = None;
        assert_eq!(
            render_subject(&config, &sample_event()),
            "ALERT - web1/disk: Disk critical"
        );

        config.subject_prefix = Some(String::new());
        assert_eq!(
            render_subject(&config, &sample_event()),
            "ALERT - web1/disk: Disk critical"
        );
    }

    #[test]
    fn subject_for_resolution() {
        let mut event = sample_event();
        event.action = "resolve".to_string();
        assert_eq!(
            render_subject(&sample_config(), &event),
            "[PROD] RESOLVED - web1/disk: Disk critical"
        );
    }

    #[test]
    fn body_has_fixed_layout() {
        let body = render_body(&sample_event(), Some(chrono_tz::UTC));

        assert_eq!(
            body,
            "92% used\n\
             Host: web1\n\
             Timestamp: 2023-11-14 22:13:20 +0000\n\
             Address:  10.0.0.5\n\
             Check Name:  disk\n\
             Command:  check_disk\n\
             Status:  2\n\
             Occurrences:  3\n"
        );
    }

    #[test]
    fn body_fields_appear_in_order() {
        let body = render_body(&sample_event(), None);
        let labels = [
            "92% used",
            "Host: ",
            "Timestamp: ",
            "Address:  ",
            "Check Name:  ",
            "Command:  ",
            "Status:  ",
            "Occurrences:  ",
        ];

        let positions: Vec<usize> = labels
            .iter()
            .map(|label| body.find(label).unwrap_or_else(|| panic!("missing {}", label)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    }

    #[test]
    fn body_is_stable_across_calls() {
        let event = sample_event();
        assert_eq!(render_body(&event, None), render_body(&event, None));
    }

    #[test]
    fn timestamp_respects_configured_timezone() {
        assert_eq!(
            format_issued(1_700_000_000, Some(chrono_tz::Europe::Paris)),
            "2023-11-14 23:13:20 +0100"
        );
    }

    #[test]
    fn timestamp_out_of_range_falls_back_to_raw() {
        assert_eq!(format_issued(i64::MAX, Some(chrono_tz::UTC)), i64::MAX.to_string());
    }

    #[test]
    fn body_preserves_multiline_output() {
        let mut event = sample_event();
        event.check.output = "CRITICAL: /var 92%\n/home 40%\n".to_string();
        let body = render_body(&event, Some(chrono_tz::UTC));
        assert!(body.starts_with("CRITICAL: /var 92%\n/home 40%\n\nHost: web1\n"));
    }
}
