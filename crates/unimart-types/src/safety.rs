//! Safety advisory verdict type.

use serde::{Deserialize, Serialize};

/// The safety advisor's current judgment on a conversation.
///
/// Field names follow the classifier wire shape (`isSafe` / `warning`)
/// so the verdict can be deserialized straight from a well-formed
/// classifier response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyVerdict {
    pub is_safe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SafetyVerdict {
    /// A verdict flagging the conversation with a warning message.
    pub fn unsafe_with(warning: impl Into<String>) -> Self {
        SafetyVerdict {
            is_safe: false,
            warning: Some(warning.into()),
        }
    }
}

impl Default for SafetyVerdict {
    /// The fail-open value: safe, no warning.
    fn default() -> Self {
        SafetyVerdict {
            is_safe: true,
            warning: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_safe() {
        let verdict = SafetyVerdict::default();
        assert!(verdict.is_safe);
        assert!(verdict.warning.is_none());
    }

    #[test]
    fn test_wire_shape() {
        let verdict: SafetyVerdict =
            serde_json::from_str(r#"{"isSafe": false, "warning": "Asked to move to WhatsApp"}"#)
                .unwrap();
        assert!(!verdict.is_safe);
        assert_eq!(verdict.warning.as_deref(), Some("Asked to move to WhatsApp"));

        // `warning` may be absent or null on safe verdicts.
        let safe: SafetyVerdict = serde_json::from_str(r#"{"isSafe": true}"#).unwrap();
        assert!(safe.is_safe);
        let safe_null: SafetyVerdict =
            serde_json::from_str(r#"{"isSafe": true, "warning": null}"#).unwrap();
        assert!(safe_null.warning.is_none());
    }

    #[test]
    fn test_unsafe_with() {
        let verdict = SafetyVerdict::unsafe_with("Upfront payment requested");
        assert!(!verdict.is_safe);
        assert_eq!(verdict.warning.as_deref(), Some("Upfront payment requested"));
    }
}
