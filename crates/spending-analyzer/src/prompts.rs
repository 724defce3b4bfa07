//! Prompt Templates
//!
//! System instructions and user messages for both analysis stages.

use crate::model::{AnalysisRequest, AnalysisState};

/// System prompt for the reason analysis stage
pub const REASON_ANALYSIS_PROMPT: &str = r#"You are a behavioral psychologist who is also a blunt, caring friend. You do not give generic budgeting advice.

Your expertise: consumer psychology, behavioral economics, cognitive biases, emotional triggers and social dynamics.

## Task

Find the REAL psychological reason behind this impulsive purchase. Skip the surface explanation and dig into:

- The need being met (belonging, validation, status, control, comfort)
- The bias at play (FOMO, scarcity mindset, social proof, instant gratification)
- The emotion underneath (anxiety, loneliness, inadequacy, boredom, excitement)
- How the person's social environment shaped the decision

## Output

Return a JSON object with exactly two fields:

1. "underlying_reason": ONE specific sentence naming the deep psychological driver
2. "triggers": an array of 2-3 short behavioral trigger labels

Example:
{
  "underlying_reason": "Buying things is a fast dopamine hit that makes work stress feel controllable for a moment.",
  "triggers": ["Stress relief seeking", "Need for control", "Instant gratification"]
}

Be specific and grounded in real psychology. Return JSON only."#;

/// System prompt for the recommendation stage
pub const RECOMMENDATION_PROMPT: &str = r#"You recommend coping techniques grounded in behavioral research and proven practice.

Draw on:
- Cognitive Behavioral Therapy (CBT) techniques
- Behavioral economics (Kahneman, Thaler, Ariely)
- Habit formation research (James Clear, BJ Fogg)
- Impulse control strategies from clinical psychology
- Techniques financial therapists see work in practice

## Requirements

- 3-4 recommendations, no more
- Each one a SPECIFIC, ACTIONABLE technique, never generic advice like "make a budget"
- Each one aimed at THIS person's trigger
- Each one with a short explanation of the psychology behind it

## Output

A JSON array of objects with "action" and "why":

[
  {
    "action": "Leave items in your cart for 48 hours before checking out.",
    "why": "The dopamine spike fades within two days, letting deliberate thinking catch up."
  }
]

Return JSON only."#;

/// User message for the reason analysis stage
pub fn reason_user_message(request: &AnalysisRequest) -> String {
    format!(
        "Amount spent: ${amount}\n\
         What they said: \"{reason}\"\n\
         Category: {category}\n\n\
         What is the real psychological reason? Return JSON only.",
        amount = request.actual_spent,
        reason = request.spending_reason,
        category = request.spending_category,
    )
}

/// User message for the recommendation stage
pub fn recommendation_user_message(state: &AnalysisState) -> String {
    format!(
        "Deep reason: {reason}\n\
         Triggers: {triggers}\n\
         What they said: \"{said}\"\n\n\
         Give 3-4 evidence-based techniques for THIS pattern. Return JSON only.",
        reason = state.underlying_reason(),
        triggers = state.behavioral_triggers().join(", "),
        said = state.request.spending_reason,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReasonAnalysis;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reason_message_embeds_request() {
        let request = AnalysisRequest::new(dec!(250), "everyone ordered cocktails")
            .with_category("dining");
        let message = reason_user_message(&request);

        assert!(message.contains("$250"));
        assert!(message.contains("\"everyone ordered cocktails\""));
        assert!(message.contains("Category: dining"));
    }

    #[test]
    fn test_recommendation_message_joins_triggers() {
        let mut state = AnalysisState::new(AnalysisRequest::new(dec!(60), "retail therapy"));
        state.apply_reason(ReasonAnalysis {
            underlying_reason: "Soothing a bad week.".into(),
            triggers: vec!["Stress".into(), "Instant gratification".into()],
        });

        let message = recommendation_user_message(&state);
        assert!(message.contains("Deep reason: Soothing a bad week."));
        assert!(message.contains("Triggers: Stress, Instant gratification"));
        assert!(message.contains("\"retail therapy\""));
    }
}
