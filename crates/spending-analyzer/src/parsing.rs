//! Response Parsing
//!
//! Turns free-form model text into typed stage outputs. Parsing never fails:
//! anything unusable is replaced by fallback content and tagged as such.

use serde_json::Value;

use crate::fallback;
use crate::model::{ReasonAnalysis, Recommendation};

const FENCE: &str = "```";

/// Parse result that keeps the fallback path visible
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Taken from the model response
    Parsed(T),
    /// Model response was unusable (fully or in part); defaults substituted
    Fallback(T),
}

impl<T> Outcome<T> {
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }

    pub const fn as_inner(&self) -> &T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }
}

/// Best-effort JSON substring of a model response.
///
/// When the response opens with a fence marker, only the text up to the next
/// marker (or the end) is kept, minus an optional language tag such as `json`.
/// Anything else is returned trimmed.
pub fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let inner = after_open
        .find(FENCE)
        .map_or(after_open, |end| &after_open[..end]);

    drop_language_tag(inner).trim()
}

/// `json\n{...}` or `json{...}` -> `{...}`; a tag is only dropped when a JSON
/// container follows it.
fn drop_language_tag(inner: &str) -> &str {
    let tag_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(inner.len());
    if tag_len == 0 {
        return inner;
    }

    let rest = &inner[tag_len..];
    match rest.trim_start().chars().next() {
        Some('{' | '[') => rest,
        _ => inner,
    }
}

fn parse_json(raw: &str) -> Option<Value> {
    serde_json::from_str(strip_fence(raw)).ok()
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Coerce a single value or a list into a list of non-blank labels
fn coerce_labels(value: &Value) -> Vec<String> {
    let label = |v: &Value| match v {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    };

    let labels: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(label).collect(),
        other => label(other).into_iter().collect(),
    };
    labels.into_iter().filter(|s| !s.is_empty()).collect()
}

/// Parse the reason analysis stage output.
///
/// Expects `{"underlying_reason": "...", "triggers": [...]}`. A missing or
/// blank reason and a missing or empty trigger list are replaced
/// independently; either substitution tags the outcome as a fallback.
pub fn parse_reason_analysis(raw: &str) -> Outcome<ReasonAnalysis> {
    let object = match parse_json(raw) {
        Some(Value::Object(map)) => map,
        _ => {
            return Outcome::Fallback(ReasonAnalysis {
                underlying_reason: fallback::DEFAULT_UNDERLYING_REASON.into(),
                triggers: fallback::default_triggers(),
            });
        }
    };

    let reason = non_blank(object.get("underlying_reason"));
    let triggers = object
        .get("triggers")
        .map(coerce_labels)
        .filter(|t| !t.is_empty());

    let substituted = reason.is_none() || triggers.is_none();
    let analysis = ReasonAnalysis {
        underlying_reason: reason
            .unwrap_or_else(|| fallback::DEFAULT_UNDERLYING_REASON.into()),
        triggers: triggers.unwrap_or_else(fallback::default_triggers),
    };

    if substituted {
        Outcome::Fallback(analysis)
    } else {
        Outcome::Parsed(analysis)
    }
}

fn recommendation_from(value: &Value) -> Option<Recommendation> {
    let object = value.as_object()?;
    let action = non_blank(object.get("action"))?;
    let why = non_blank(object.get("why")).unwrap_or_default();
    Some(Recommendation { action, why })
}

/// Locate the recommendation list: a bare array, an object wrapping one
/// under `recommendations`, or a single recommendation object.
fn recommendation_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("recommendations") {
            Some(Value::Array(items)) => items,
            Some(single @ Value::Object(_)) => vec![single],
            Some(_) => Vec::new(),
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    }
}

/// Parse the recommendation stage output.
///
/// Expects `[{"action": "...", "why": "..."}, ...]`. Entries without an
/// action are dropped; when nothing usable remains the default list is used.
pub fn parse_recommendations(raw: &str) -> Outcome<Vec<Recommendation>> {
    let recommendations: Vec<Recommendation> = parse_json(raw)
        .map(recommendation_items)
        .unwrap_or_default()
        .iter()
        .filter_map(recommendation_from)
        .collect();

    if recommendations.is_empty() {
        Outcome::Fallback(fallback::default_recommendations())
    } else {
        Outcome::Parsed(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REASON_JSON: &str = r#"{
        "underlying_reason": "Saying no felt like risking your place in the group.",
        "triggers": ["Social pressure", "FOMO"]
    }"#;

    #[test]
    fn test_strip_fence_plain() {
        assert_eq!(strip_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_tagged() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_fence(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_untagged_and_inline_tag() {
        assert_eq!(strip_fence("```\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_fence("```json{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_unterminated() {
        assert_eq!(strip_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_ignores_trailing_chatter() {
        let raw = "```json\n{\"a\": 1}\n```\nHope this helps!";
        assert_eq!(strip_fence(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_only_leading() {
        let raw = "Sure! ```json\n{}\n```";
        assert_eq!(strip_fence(raw), raw);
    }

    #[test]
    fn test_reason_parsed() {
        let outcome = parse_reason_analysis(REASON_JSON);
        assert!(!outcome.is_fallback());
        let analysis = outcome.into_inner();
        assert_eq!(analysis.triggers, vec!["Social pressure", "FOMO"]);
        assert!(analysis.underlying_reason.starts_with("Saying no"));
    }

    #[test]
    fn test_reason_fenced_matches_unwrapped() {
        let fenced = format!("```json\n{REASON_JSON}\n```");
        assert_eq!(parse_reason_analysis(&fenced), parse_reason_analysis(REASON_JSON));
    }

    #[test]
    fn test_reason_garbage_falls_back() {
        let outcome = parse_reason_analysis("I think you were stressed.");
        assert!(outcome.is_fallback());
        let analysis = outcome.into_inner();
        assert_eq!(analysis.underlying_reason, fallback::DEFAULT_UNDERLYING_REASON);
        assert_eq!(analysis.triggers.len(), 2);
    }

    #[test]
    fn test_reason_missing_triggers_keeps_reason() {
        let outcome = parse_reason_analysis(r#"{"underlying_reason": "Status seeking."}"#);
        assert!(outcome.is_fallback());
        let analysis = outcome.into_inner();
        assert_eq!(analysis.underlying_reason, "Status seeking.");
        assert_eq!(analysis.triggers, fallback::default_triggers());
    }

    #[test]
    fn test_reason_scalar_trigger_coerced() {
        let outcome =
            parse_reason_analysis(r#"{"underlying_reason": "r", "triggers": "Peer pressure"}"#);
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.into_inner().triggers, vec!["Peer pressure"]);
    }

    #[test]
    fn test_reason_drops_blank_triggers() {
        let outcome = parse_reason_analysis(
            r#"{"underlying_reason": "r", "triggers": ["", "  ", null, "Boredom", 7]}"#,
        );
        assert_eq!(outcome.into_inner().triggers, vec!["Boredom", "7"]);
    }

    #[test]
    fn test_reason_not_an_object() {
        assert!(parse_reason_analysis(r#"["FOMO"]"#).is_fallback());
    }

    #[test]
    fn test_recommendations_parsed() {
        let raw = r#"[
            {"action": "Wait 48 hours before buying", "why": "The urge fades."},
            {"action": "Suggest the venue yourself"}
        ]"#;
        let outcome = parse_recommendations(raw);
        assert!(!outcome.is_fallback());
        let recs = outcome.into_inner();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].why, "");
    }

    #[test]
    fn test_recommendations_empty_array_falls_back() {
        let outcome = parse_recommendations("[]");
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_inner(), fallback::default_recommendations());
    }

    #[test]
    fn test_recommendations_garbage_falls_back() {
        assert!(parse_recommendations("Try spending less!").is_fallback());
        assert!(parse_recommendations(r#"["just a string"]"#).is_fallback());
    }

    #[test]
    fn test_recommendations_single_object_coerced() {
        let outcome = parse_recommendations(r#"{"action": "Leave cards at home", "why": "Friction."}"#);
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.as_inner().len(), 1);
    }

    #[test]
    fn test_recommendations_wrapped() {
        let raw = "```json\n{\"recommendations\": [{\"action\": \"a\", \"why\": \"w\"}]}\n```";
        let recs = parse_recommendations(raw).into_inner();
        assert_eq!(recs, vec![Recommendation::new("a", "w")]);
    }

    #[test]
    fn test_recommendations_skip_missing_action() {
        let raw = r#"[{"why": "orphan"}, {"action": "Keep", "why": "ok"}]"#;
        let recs = parse_recommendations(raw).into_inner();
        assert_eq!(recs, vec![Recommendation::new("Keep", "ok")]);
    }
}
