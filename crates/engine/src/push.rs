//! Push metadata lines
//!
//! Git feeds a post-receive hook one line per updated ref on standard
//! input, formatted as `<old-id> <new-id> <ref-name>`. The dispatcher
//! forwards that stream to subhooks byte for byte; this type exists to
//! build synthetic events for replay runs and to parse incoming lines for
//! diagnostics.

use shipit_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Old object id used for synthetic replay events.
///
/// Replay feeds placeholder ids, so subhooks that dereference object ids
/// must tolerate non-existent ones. The default fetch subhook only looks
/// at the ref name and is unaffected.
pub const PLACEHOLDER_OLD_ID: &str = "1";

/// New object id used for synthetic replay events
pub const PLACEHOLDER_NEW_ID: &str = "2";

/// One updated ref within a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// Object id the ref pointed at before the push
    pub old_id: String,
    /// Object id the ref points at now
    pub new_id: String,
    /// Fully qualified ref name, e.g. `refs/heads/master`
    pub ref_name: String,
}

impl PushEvent {
    /// Build an event from its parts
    pub fn new(
        old_id: impl Into<String>,
        new_id: impl Into<String>,
        ref_name: impl Into<String>,
    ) -> Self {
        Self {
            old_id: old_id.into(),
            new_id: new_id.into(),
            ref_name: ref_name.into(),
        }
    }

    /// Build a replay event for `ref_name` with placeholder object ids
    pub fn synthetic(ref_name: impl Into<String>) -> Self {
        Self::new(PLACEHOLDER_OLD_ID, PLACEHOLDER_NEW_ID, ref_name)
    }

    /// The newline-terminated wire line for this event
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }

    /// Parse every line of a push input stream
    pub fn parse_all(input: &str) -> Result<Vec<Self>> {
        input
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for PushEvent {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(old), Some(new), Some(ref_name), None) => {
                Ok(Self::new(old, new, ref_name))
            }
            _ => Err(Error::Message(format!(
                "Malformed push line '{line}': expected '<old-id> <new-id> <ref-name>'"
            ))),
        }
    }
}

impl fmt::Display for PushEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.old_id, self.new_id, self.ref_name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_line_round_trip() {
        let event = PushEvent::new("aaa", "bbb", "refs/heads/master");
        let parsed: PushEvent = event.to_line().trim_end().parse().unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_synthetic_uses_placeholders() {
        let event = PushEvent::synthetic("refs/heads/main");
        assert_eq!(event.to_line(), "1 2 refs/heads/main\n");
    }

    #[test]
    fn test_parse_all_multiple_refs() {
        let input = "a b refs/heads/master\nc d refs/tags/v1\n";
        let events = PushEvent::parse_all(input).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].ref_name, "refs/tags/v1");
    }

    #[test]
    fn test_parse_all_skips_blank_lines() {
        let events = PushEvent::parse_all("a b refs/heads/x\n\n").unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_malformed_line_rejected() {
        assert!("just-two fields".parse::<PushEvent>().is_err());
        assert!("one two three four".parse::<PushEvent>().is_err());
        assert!("".parse::<PushEvent>().is_err());
    }
}
