//! Interpreting borrower answers through the language model
//!
//! The model is asked for a single token or number; everything it returns is
//! validated here before it can reach the interview state.

use super::llm::CompletionModel;
use super::prompts;
use crate::contract::{CapturedInput, CreditScoreCategory, InputField};
use std::time::Instant;

/// Borrower's answer to "shall we begin?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Proceed,
    Decline,
    Unclear,
}

/// Classify a model verdict; PROCEED wins when both markers appear
pub fn parse_consent(response: &str) -> Consent {
    let upper = response.to_uppercase();
    if upper.contains("PROCEED") {
        Consent::Proceed
    } else if upper.contains("DECLINE") {
        Consent::Decline
    } else {
        Consent::Unclear
    }
}

/// Parse a numeric model answer such as `75000`, `75,000.0` or `$75,000`
pub fn parse_amount(response: &str) -> Option<f64> {
    let cleaned: String = response
        .trim()
        .trim_matches('"')
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Smallest income or property value taken, in dollars
const MIN_BASE_AMOUNT: f64 = 1.0;
/// Largest amount taken for any field; keeps both ratios finite
const MAX_AMOUNT: f64 = 1e12;

/// Range check per field: income and property value must be at least one
/// dollar, debt and down payment may be zero, nothing may exceed
/// [`MAX_AMOUNT`]
pub fn accepts(field: InputField, amount: f64) -> bool {
    let floor_ok = match field {
        InputField::AnnualIncome | InputField::PropertyValue => amount >= MIN_BASE_AMOUNT,
        InputField::MonthlyDebt | InputField::DownPayment => amount >= 0.0,
        InputField::CreditScore => return false,
    };
    floor_ok && amount <= MAX_AMOUNT
}

/// Turn a raw model answer into a validated input for `field`
pub fn interpret(field: InputField, response: &str) -> Option<CapturedInput> {
    if field == InputField::CreditScore {
        return response
            .trim()
            .trim_matches('"')
            .parse::<CreditScoreCategory>()
            .ok()
            .map(CapturedInput::CreditScore);
    }

    let amount = parse_amount(response).filter(|amount| accepts(field, *amount))?;
    Some(match field {
        InputField::AnnualIncome => CapturedInput::AnnualIncome(amount),
        InputField::MonthlyDebt => CapturedInput::MonthlyDebt(amount),
        InputField::PropertyValue => CapturedInput::PropertyValue(amount),
        InputField::DownPayment => CapturedInput::DownPayment(amount),
        InputField::CreditScore => return None,
    })
}

async fn ask(
    model: &dyn CompletionModel,
    prompt: &str,
    purpose: &'static str,
) -> anyhow::Result<String> {
    let started = Instant::now();
    let result = model.complete(prompt).await;
    let response_time_ms = started.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(response) => tracing::debug!(
            model = model.model_name(),
            purpose,
            response_time_ms,
            response = %response,
            "LLM interaction"
        ),
        Err(e) => tracing::warn!(
            model = model.model_name(),
            purpose,
            response_time_ms,
            error = %e,
            "LLM interaction failed"
        ),
    }

    result
}

/// Ask the model whether the borrower agreed to start
pub async fn classify_consent(
    model: &dyn CompletionModel,
    user_message: &str,
) -> anyhow::Result<Consent> {
    let response = ask(model, &prompts::consent_prompt(user_message), "consent").await?;
    Ok(parse_consent(&response))
}

/// Ask the model for the value of `field`; `Ok(None)` when the answer is unusable
pub async fn extract_input(
    model: &dyn CompletionModel,
    field: InputField,
    user_message: &str,
) -> anyhow::Result<Option<CapturedInput>> {
    let response = ask(
        model,
        &prompts::extraction_prompt(field, user_message),
        field.column(),
    )
    .await?;
    Ok(interpret(field, &response))
}
