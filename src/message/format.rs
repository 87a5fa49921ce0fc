//! Per-sink formatting of one log record.
//!
//! # Formats
//! ```text
//! local:  [ 16.10.2026 09:04:05 ] < INFO >    app - 1.2.0: frag - frag
//! remote: INFO - app - 1.2.0: frag - frag
//! host:   app - 1.2.0: frag - frag
//! chat:   message card / adaptive card JSON
//! ```

use chrono::{DateTime, Local};
use serde_json::{json, Value};

use crate::config::package::PackageInfo;
use crate::severity::Severity;

const SEPARATOR: &str = " - ";
const CARD_SUMMARY: &str = "Log notification";

/// The two chat payload shapes. Which one is posted depends on the webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCards {
    pub message_card: Value,
    pub adaptive_card: Value,
}

/// Everything the sinks need for one call, built once per dispatch.
#[derive(Debug, Clone)]
pub struct FormattedRecord {
    pub severity: Severity,
    pub fragments: Vec<String>,
    /// `"<name> - <version>: "` or empty when the package is unknown.
    pub details: String,
    /// Details followed by the joined fragments, without date or level.
    pub text: String,
    pub local_text: String,
    pub remote_text: String,
    pub cards: ChatCards,
    pub resolved_at: DateTime<Local>,
}

impl FormattedRecord {
    pub fn new(severity: Severity, fragments: Vec<String>, package: Option<&PackageInfo>) -> Self {
        Self::at(severity, fragments, package, Local::now())
    }

    pub fn at(
        severity: Severity,
        fragments: Vec<String>,
        package: Option<&PackageInfo>,
        resolved_at: DateTime<Local>,
    ) -> Self {
        let details = package
            .map(|p| format!("{} - {}: ", p.name, p.version))
            .unwrap_or_default();
        let text = format!("{details}{}", fragments.join(SEPARATOR));
        let local_text = format!(
            "[ {} ] < {} >{} {}",
            resolved_at.format("%d.%m.%Y %H:%M:%S"),
            severity.label(),
            severity.padding(),
            text
        );
        let remote_text = format!("{} - {}", severity.label(), text);
        let title = format!("{} - {}", severity.label(), details);
        let cards = ChatCards {
            message_card: message_card(severity, &title, &fragments),
            adaptive_card: adaptive_card(severity, &title, &fragments),
        };

        Self {
            severity,
            fragments,
            details,
            text,
            local_text,
            remote_text,
            cards,
            resolved_at,
        }
    }
}

/// Split `"key: value"` into a fact; fragments without a leading key become
/// `Msg` facts.
fn fact(fragment: &str) -> (String, String) {
    match fragment.find(':') {
        Some(idx) if idx > 0 => (
            fragment[..idx].trim().to_string(),
            fragment[idx + 1..].trim().to_string(),
        ),
        _ => ("Msg".to_string(), fragment.to_string()),
    }
}

fn message_card(severity: Severity, title: &str, fragments: &[String]) -> Value {
    let facts: Vec<Value> = fragments
        .iter()
        .map(|f| {
            let (name, value) = fact(f);
            json!({ "name": name, "value": value })
        })
        .collect();

    json!({
        "@type": "MessageCard",
        "@context": "https://schema.org/extensions",
        "summary": CARD_SUMMARY,
        "themeColor": severity.theme_color(),
        "title": title,
        "sections": [{ "facts": facts }],
    })
}

fn adaptive_card(severity: Severity, title: &str, fragments: &[String]) -> Value {
    let mut body = vec![json!({
        "type": "TextBlock",
        "text": title,
        "weight": "Bolder",
        "size": "Medium",
        "color": severity.adaptive_color(),
        "wrap": true,
    })];
    body.extend(fragments.iter().map(|f| {
        json!({
            "type": "TextBlock",
            "text": f,
            "wrap": true,
        })
    }));

    json!({
        "type": "message",
        "attachments": [{
            "contentType": "application/vnd.microsoft.card.adaptive",
            "contentUrl": null,
            "content": {
                "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
                "type": "AdaptiveCard",
                "version": "1.2",
                "msteams": { "width": "Full" },
                "body": body,
            },
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 7, 9, 4, 5).single().unwrap()
    }

    fn pkg() -> PackageInfo {
        PackageInfo::new("billing", "1.2.0")
    }

    #[test]
    fn test_local_line_layout() {
        let record = FormattedRecord::at(
            Severity::Info,
            vec!["hello".into(), "42".into()],
            Some(&pkg()),
            fixed_time(),
        );
        assert_eq!(
            record.local_text,
            "[ 07.03.2026 09:04:05 ] < INFO >    billing - 1.2.0: hello - 42"
        );
    }

    #[test]
    fn test_remote_line_without_package() {
        let record = FormattedRecord::at(Severity::Warn, vec!["disk".into()], None, fixed_time());
        assert_eq!(record.remote_text, "WARN - disk");
        assert_eq!(record.text, "disk");
        assert!(record.details.is_empty());
    }

    #[test]
    fn test_message_card_facts() {
        let record = FormattedRecord::at(
            Severity::Error,
            vec!["user: alice".into(), "plain".into(), ":leading".into()],
            Some(&pkg()),
            fixed_time(),
        );
        let card = &record.cards.message_card;
        assert_eq!(card["@type"], "MessageCard");
        assert_eq!(card["themeColor"], Severity::Error.theme_color());
        assert_eq!(card["title"], "ERROR - billing - 1.2.0: ");

        let facts = card["sections"][0]["facts"].as_array().unwrap();
        assert_eq!(facts[0], json!({ "name": "user", "value": "alice" }));
        assert_eq!(facts[1], json!({ "name": "Msg", "value": "plain" }));
        assert_eq!(facts[2], json!({ "name": "Msg", "value": ":leading" }));
    }

    #[test]
    fn test_adaptive_card_blocks() {
        let record = FormattedRecord::at(
            Severity::Warn,
            vec!["a".into(), "b".into()],
            None,
            fixed_time(),
        );
        let card = &record.cards.adaptive_card;
        assert_eq!(card["type"], "message");
        let body = card["attachments"][0]["content"]["body"].as_array().unwrap();
        assert_eq!(body.len(), 3);
        assert_eq!(body[0]["color"], "warning");
        assert_eq!(body[2]["text"], "b");
    }
}
