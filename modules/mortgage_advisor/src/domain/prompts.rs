//! Prompt templates and canned replies for the interview

use crate::contract::{CapturedInput, InputField};

pub const GREETING: &str = "Hello! Welcome to the Mortgage Advisor chatbot. I'm here to assist you with a preliminary mortgage eligibility assessment. Would you like to begin the assessment process today? Just let me know when you're ready to get started!";

pub const PROCEED: &str = "Great! Let's get started with your mortgage assessment. First, I'll need to know your annual income. Please tell me your total yearly income before taxes.";

pub const DECLINE: &str = "No problem! Feel free to come back anytime when you're ready to explore your mortgage options. Have a great day!";

pub const CONSENT_UNCLEAR: &str = "I want to make sure I understand correctly. Are you interested in getting a mortgage eligibility assessment today? Please let me know with a simple yes or no.";

pub const ASSESSMENT_READY: &str =
    "✅ Your mortgage assessment is complete! Please see the detailed results below.";

pub const MISSING_INFORMATION: &str =
    "I'm missing some information. Let me start over to collect all needed details.";

pub const ALREADY_COMPLETE: &str = "Assessment completed. Would you like to start over?";

pub const PROCESSING_ERROR: &str = "I'm sorry, I encountered an error. Please try again.";

const CREDIT_RANGES: &str =
    "Excellent (750+), Good (700-749), Fair (650-699), or Poor (below 650)";

/// Re-prompt when an answer could not be understood
pub fn invalid_answer(field: InputField) -> String {
    match field {
        InputField::AnnualIncome => "I need a valid annual income amount. Please provide your yearly income before taxes as a number (for example: 75000 or 75k).".to_string(),
        InputField::MonthlyDebt => "Please provide a valid monthly debt amount as a number (for example: 1500 or 0 if you have no debt).".to_string(),
        InputField::CreditScore => format!("Please specify your credit score range: {}.", CREDIT_RANGES),
        InputField::PropertyValue => "Please provide a valid property value as a number (for example: 300000 or 300k).".to_string(),
        InputField::DownPayment => "Please provide a valid down payment amount as a number (for example: 50000 or 50k).".to_string(),
    }
}

/// Confirm a value that was just recorded
pub fn acknowledgement(captured: CapturedInput) -> String {
    match captured {
        CapturedInput::AnnualIncome(amount) => format!(
            "Thank you! I've recorded your annual income as {}.",
            format_dollars(amount)
        ),
        CapturedInput::MonthlyDebt(amount) => format!(
            "Got it! I've recorded your monthly debt as {}.",
            format_dollars(amount)
        ),
        CapturedInput::CreditScore(category) => {
            format!("Perfect! I've noted your credit score as {}.", category)
        }
        CapturedInput::PropertyValue(amount) => format!(
            "Excellent! I've recorded the property value as {}.",
            format_dollars(amount)
        ),
        CapturedInput::DownPayment(amount) => format!(
            "Thank you! I've recorded your down payment as {}.",
            format_dollars(amount)
        ),
    }
}

/// Question that collects `field`
pub fn question(field: InputField) -> String {
    match field {
        InputField::AnnualIncome => "Now, what's your annual income? Please tell me your total yearly income before taxes.".to_string(),
        InputField::MonthlyDebt => "Next, I need to understand your monthly debt obligations. Please tell me your total monthly debt payments (credit cards, student loans, car payments, etc.).".to_string(),
        InputField::CreditScore => format!("Now, what's your credit score range? Please choose from: {}.", CREDIT_RANGES),
        InputField::PropertyValue => "Now, what's the value of the property you're looking to purchase?".to_string(),
        InputField::DownPayment => "Finally, how much are you planning to put down as a down payment?".to_string(),
    }
}

/// Acknowledge `captured` and ask for the next missing field
pub fn recorded(captured: CapturedInput, next: InputField) -> String {
    format!("{} {}", acknowledgement(captured), question(next))
}

// ===== Model prompts =====

pub fn consent_prompt(user_message: &str) -> String {
    format!(
        r#"
Analyze the user's message and determine if they are expressing consent or agreement to proceed.

User message: "{user_message}"

Instructions:
- If the user says yes, agrees, or wants to continue, respond with exactly: "PROCEED"
- If the user says no, declines, or wants to stop, respond with exactly: "DECLINE"
- If the message is unclear, respond with exactly: "UNCLEAR"

Response:"#
    )
}

pub fn extraction_prompt(field: InputField, user_message: &str) -> String {
    match field {
        InputField::AnnualIncome => format!(
            r#"
Extract the annual income amount from the user's message. The user is providing their yearly income before taxes.

User message: "{user_message}"

Instructions:
- Extract the numeric value representing annual income
- Convert to a float (e.g., "50k" -> 50000.0, "75,000" -> 75000.0)
- If you find a valid income, respond with just the number
- If no valid income found, respond with "INVALID"

Response:"#
        ),
        InputField::MonthlyDebt => format!(
            r#"
Extract the monthly debt amount from the user's message. This includes credit cards, loans, car payments, etc.

User message: "{user_message}"

Instructions:
- Extract the numeric value representing monthly debt payments
- Convert to a float (e.g., "1500" -> 1500.0, "1.5k" -> 1500.0)
- If you find a valid debt amount, respond with just the number
- If user explicitly says they have "no debt", "zero debt", or "0", respond with "0"
- If user says "I don't know", "not sure", "unclear", or provides non-numeric responses, respond with "INVALID"
- If no valid amount found, respond with "INVALID"

Response:"#
        ),
        InputField::CreditScore => format!(
            r#"
Determine the credit score category from the user's message.

User message: "{user_message}"

Instructions:
- Match to one of these categories: "Excellent", "Good", "Fair", "Poor"
- Look for keywords like "excellent", "good", "fair", "poor" or score ranges
- Excellent: 750+, Good: 700-749, Fair: 650-699, Poor: below 650
- Respond with exactly one of: "Excellent", "Good", "Fair", "Poor"
- If unclear, respond with "INVALID"

Response:"#
        ),
        InputField::PropertyValue => format!(
            r#"
Extract the property value from the user's message.

User message: "{user_message}"

Instructions:
- Extract the numeric value representing property/home value
- Convert to a float (e.g., "300k" -> 300000.0, "450,000" -> 450000.0)
- If you find a valid property value, respond with just the number
- If no valid value found, respond with "INVALID"

Response:"#
        ),
        InputField::DownPayment => format!(
            r#"
Extract the down payment amount from the user's message.

User message: "{user_message}"

Instructions:
- Extract the numeric value representing down payment
- Convert to a float (e.g., "50k" -> 50000.0, "60,000" -> 60000.0)
- If you find a valid down payment, respond with just the number
- If no valid amount found, respond with "INVALID"

Response:"#
        ),
    }
}

/// Whole dollars with thousands separators, e.g. `$1,234,568`
pub fn format_dollars(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::CreditScoreCategory;

    #[test]
    fn dollars_are_grouped_and_rounded() {
        assert_eq!(format_dollars(0.0), "$0");
        assert_eq!(format_dollars(999.0), "$999");
        assert_eq!(format_dollars(1_000.0), "$1,000");
        assert_eq!(format_dollars(75_000.0), "$75,000");
        assert_eq!(format_dollars(1_234_567.6), "$1,234,568");
        assert_eq!(format_dollars(-2_500.0), "-$2,500");
    }

    #[test]
    fn prompts_quote_the_user_message() {
        let prompt = extraction_prompt(InputField::AnnualIncome, "about 80k a year");
        assert!(prompt.contains("User message: \"about 80k a year\""));
        assert!(consent_prompt("sure").contains("\"PROCEED\""));
    }

    #[test]
    fn acknowledgements_lead_into_the_next_question() {
        let reply = recorded(CapturedInput::AnnualIncome(80_000.0), InputField::MonthlyDebt);
        assert!(reply.contains("$80,000"));
        assert!(reply.contains("monthly debt"));

        let reply = recorded(CapturedInput::MonthlyDebt(1_500.0), InputField::CreditScore);
        assert!(reply.contains("credit score range"));

        let reply = recorded(
            CapturedInput::CreditScore(CreditScoreCategory::Good),
            InputField::PropertyValue,
        );
        assert!(reply.contains("as Good"));
        assert!(reply.contains("value of the property"));
    }

    #[test]
    fn follow_up_question_comes_from_the_missing_field() {
        let reply = recorded(CapturedInput::PropertyValue(400_000.0), InputField::AnnualIncome);
        assert!(reply.starts_with("Excellent! I've recorded the property value as $400,000."));
        assert!(reply.ends_with(&question(InputField::AnnualIncome)));
        assert!(!reply.contains("down payment"));
    }
}
