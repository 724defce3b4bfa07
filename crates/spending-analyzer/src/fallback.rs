//! Fixed content used when a model response cannot be used.

use crate::model::Recommendation;

pub const DEFAULT_UNDERLYING_REASON: &str =
    "You might be spending to fill an emotional need - let's look deeper at this pattern.";

pub const DEFAULT_TRIGGERS: [&str; 2] = ["Emotional spending", "Impulse control"];

pub const DEFAULT_RECOMMENDATIONS: [(&str, &str); 3] = [
    (
        "Set a 24-hour wait rule before purchases",
        "Gives your rational brain time to catch up",
    ),
    (
        "Track what triggers your spending urges",
        "Awareness is the first step to change",
    ),
    (
        "Find a healthier dopamine source",
        "Address the need without spending",
    ),
];

pub fn default_triggers() -> Vec<String> {
    DEFAULT_TRIGGERS.iter().map(ToString::to_string).collect()
}

pub fn default_recommendations() -> Vec<Recommendation> {
    DEFAULT_RECOMMENDATIONS
        .iter()
        .map(|(action, why)| Recommendation::new(*action, *why))
        .collect()
}
