//! Options validation.
//!
//! # Responsibilities
//! - Reject options files whose values have the wrong shape (serde handles syntax)
//!
//! # Design Decisions
//! - Returns all problems, not just the first
//! - Values with a lenient meaning are left to the resolver and the sinks,
//!   exactly as for options built in code: an unknown level means "accept
//!   all", a bad URL surfaces at build or send time, `timeout_ms = 0` means no
//!   deadline. Each of those becomes a warning, not a rejected file

use crate::config::schema::{Affix, LogOptions};

fn check_affix(errors: &mut Vec<String>, field: &str, affix: Option<&Affix>) {
    if let Some(Affix::Invalid(value)) = affix {
        errors.push(format!("{field} must be a string, got {value}"));
    }
}

pub fn validate_options(options: &LogOptions) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(syslog) = &options.syslog {
        if syslog.port == Some(0) {
            errors.push("syslog.port must be greater than 0".to_string());
        }
    }
    check_affix(&mut errors, "prefix", options.prefix.as_ref());
    check_affix(&mut errors, "suffix", options.suffix.as_ref());

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{RemoteOptions, SyslogOptions, TeamsOptions};

    #[test]
    fn test_valid_options() {
        let options = LogOptions::new()
            .prefix("svc")
            .remote(RemoteOptions::new("https://logs.example", "t"));
        assert!(validate_options(&options).is_ok());
    }

    #[test]
    fn test_lenient_values_accepted() {
        let options = LogOptions::new()
            .remote(RemoteOptions {
                level: Some("loud".into()),
                timeout_ms: Some(0),
                ..RemoteOptions::new("https://logs.example", "t")
            })
            .teams(TeamsOptions::new("nope"));
        assert!(validate_options(&options).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let options = LogOptions {
            prefix: Some(Affix::Invalid(serde_json::json!({ "a": 1 }))),
            suffix: Some(Affix::Invalid(serde_json::json!(12))),
            ..LogOptions::new().syslog(SyslogOptions {
                host: Some("logs.example".into()),
                port: Some(0),
                ..SyslogOptions::default()
            })
        };

        let errors = validate_options(&options).unwrap_err();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }
}
