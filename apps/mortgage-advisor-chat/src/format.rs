//! Plain-text rendering of transcripts and assessment results

use mortgage_advisor::contract::{AssessmentOutcome, AssessmentResult, Message, MessageRole};
use mortgage_advisor::domain::prompts::format_dollars;
use std::fmt::Write;

/// Ratio as a percentage with one decimal, e.g. `0.2254` -> `22.5%`
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn dti_label(dti: f64) -> &'static str {
    if dti < 0.43 {
        "good"
    } else {
        "high"
    }
}

fn ltv_label(ltv: f64) -> &'static str {
    if ltv < 0.80 {
        "good"
    } else if ltv <= 0.95 {
        "high"
    } else {
        "too high"
    }
}

fn outcome_marker(outcome: AssessmentOutcome) -> &'static str {
    match outcome {
        AssessmentOutcome::Approved => "[OK]",
        AssessmentOutcome::PreQualified => "[!]",
        AssessmentOutcome::NeedsReview => "[X]",
    }
}

fn dollars(amount: Option<f64>) -> String {
    amount.map(format_dollars).unwrap_or_else(|| "-".to_string())
}

pub fn format_assessment(result: &AssessmentResult) -> String {
    let inputs = &result.user_inputs;
    let metrics = &result.calculated_metrics;
    let assessment = &result.assessment;

    let mut out = String::new();
    let _ = writeln!(out, "=== Mortgage Assessment Result ===");
    let _ = writeln!(
        out,
        "{} {}",
        outcome_marker(assessment.outcome),
        assessment.outcome
    );
    let _ = writeln!(out, "{}", assessment.notes);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Debt-to-income: {} ({})",
        percent(metrics.dti_ratio),
        dti_label(metrics.dti_ratio)
    );
    let _ = writeln!(
        out,
        "Loan-to-value:  {} ({})",
        percent(metrics.ltv_ratio),
        ltv_label(metrics.ltv_ratio)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Annual income:  {}", dollars(inputs.annual_income));
    let _ = writeln!(out, "Monthly debt:   {}", dollars(inputs.monthly_debt));
    let _ = writeln!(
        out,
        "Credit score:   {}",
        inputs
            .credit_score_category
            .map(|c| c.as_str())
            .unwrap_or("-")
    );
    let _ = writeln!(out, "Property value: {}", dollars(inputs.property_value));
    let _ = write!(out, "Down payment:   {}", dollars(inputs.down_payment));
    out
}

pub fn format_message(message: &Message) -> String {
    let speaker = match message.role {
        MessageRole::User => "You",
        MessageRole::Assistant => "Advisor",
    };
    format!(
        "[{}] {}: {}",
        message.timestamp.format("%H:%M:%S"),
        speaker,
        message.content
    )
}

pub fn format_transcript(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "(no messages yet)".to_string();
    }
    messages
        .iter()
        .map(format_message)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_advisor::contract::{
        Assessment, CalculatedMetrics, CreditScoreCategory, UserInputs,
    };

    fn approved() -> AssessmentResult {
        AssessmentResult {
            user_inputs: UserInputs {
                annual_income: Some(80_000.0),
                monthly_debt: Some(1_500.0),
                credit_score_category: Some(CreditScoreCategory::Good),
                property_value: Some(400_000.0),
                down_payment: Some(120_000.0),
            },
            calculated_metrics: CalculatedMetrics {
                dti_ratio: 0.225,
                ltv_ratio: 0.7,
            },
            assessment: Assessment {
                outcome: AssessmentOutcome::Approved,
                notes: "User meets all criteria for approval.".to_string(),
            },
        }
    }

    #[test]
    fn percentages_use_one_decimal() {
        assert_eq!(percent(0.225), "22.5%");
        assert_eq!(percent(0.7), "70.0%");
        assert_eq!(percent(1.0), "100.0%");
    }

    #[test]
    fn assessment_lists_outcome_ratios_and_inputs() {
        let text = format_assessment(&approved());
        assert!(text.contains("[OK] Approved"));
        assert!(text.contains("User meets all criteria for approval."));
        assert!(text.contains("Debt-to-income: 22.5% (good)"));
        assert!(text.contains("Loan-to-value:  70.0% (good)"));
        assert!(text.contains("Annual income:  $80,000"));
        assert!(text.contains("Credit score:   Good"));
        assert!(text.ends_with("Down payment:   $120,000"));
    }

    #[test]
    fn ltv_bands() {
        assert_eq!(ltv_label(0.79), "good");
        assert_eq!(ltv_label(0.80), "high");
        assert_eq!(ltv_label(0.95), "high");
        assert_eq!(ltv_label(0.96), "too high");
        assert_eq!(dti_label(0.43), "high");
    }

    #[test]
    fn empty_transcript() {
        assert_eq!(format_transcript(&[]), "(no messages yet)");
    }
}
