//! Contract models for the mortgage advisor
//!
//! These models are transport-agnostic and shared by the domain, storage and
//! API layers. NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

// ===== Borrower inputs =====

/// Self-reported credit score band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditScoreCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl CreditScoreCategory {
    pub const ALL: [CreditScoreCategory; 4] = [
        CreditScoreCategory::Excellent,
        CreditScoreCategory::Good,
        CreditScoreCategory::Fair,
        CreditScoreCategory::Poor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for CreditScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditScoreCategory {
    type Err = String;

    /// Case-insensitive; surrounding whitespace and a trailing period are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_end_matches('.').trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| format!("unknown credit score category: {}", s))
    }
}

/// The five figures collected during the interview
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserInputs {
    /// Gross yearly income in dollars
    pub annual_income: Option<f64>,
    /// Total monthly debt payments in dollars
    pub monthly_debt: Option<f64>,
    pub credit_score_category: Option<CreditScoreCategory>,
    /// Value of the property to purchase in dollars
    pub property_value: Option<f64>,
    /// Down payment saved in dollars
    pub down_payment: Option<f64>,
}

impl UserInputs {
    /// All five inputs are present
    pub fn is_complete(&self) -> bool {
        self.next_missing().is_none()
    }

    /// First field still missing, in collection order
    pub fn next_missing(&self) -> Option<InputField> {
        InputField::ORDER.into_iter().find(|field| !self.has(*field))
    }

    pub fn has(&self, field: InputField) -> bool {
        match field {
            InputField::AnnualIncome => self.annual_income.is_some(),
            InputField::MonthlyDebt => self.monthly_debt.is_some(),
            InputField::CreditScore => self.credit_score_category.is_some(),
            InputField::PropertyValue => self.property_value.is_some(),
            InputField::DownPayment => self.down_payment.is_some(),
        }
    }

    /// Apply a captured value, replacing any previous value for that field
    pub fn apply(&mut self, captured: CapturedInput) {
        match captured {
            CapturedInput::AnnualIncome(v) => self.annual_income = Some(v),
            CapturedInput::MonthlyDebt(v) => self.monthly_debt = Some(v),
            CapturedInput::CreditScore(c) => self.credit_score_category = Some(c),
            CapturedInput::PropertyValue(v) => self.property_value = Some(v),
            CapturedInput::DownPayment(v) => self.down_payment = Some(v),
        }
    }
}

/// Interview input fields in collection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    AnnualIncome,
    MonthlyDebt,
    CreditScore,
    PropertyValue,
    DownPayment,
}

impl InputField {
    pub const ORDER: [InputField; 5] = [
        InputField::AnnualIncome,
        InputField::MonthlyDebt,
        InputField::CreditScore,
        InputField::PropertyValue,
        InputField::DownPayment,
    ];

    /// Storage column name
    pub fn column(self) -> &'static str {
        match self {
            Self::AnnualIncome => "annual_income",
            Self::MonthlyDebt => "monthly_debt",
            Self::CreditScore => "credit_score_category",
            Self::PropertyValue => "property_value",
            Self::DownPayment => "down_payment",
        }
    }

    fn position(self) -> u8 {
        match self {
            Self::AnnualIncome => 0,
            Self::MonthlyDebt => 1,
            Self::CreditScore => 2,
            Self::PropertyValue => 3,
            Self::DownPayment => 4,
        }
    }
}

/// A validated value extracted from a borrower's answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapturedInput {
    AnnualIncome(f64),
    MonthlyDebt(f64),
    CreditScore(CreditScoreCategory),
    PropertyValue(f64),
    DownPayment(f64),
}

impl CapturedInput {
    pub fn field(&self) -> InputField {
        match self {
            Self::AnnualIncome(_) => InputField::AnnualIncome,
            Self::MonthlyDebt(_) => InputField::MonthlyDebt,
            Self::CreditScore(_) => InputField::CreditScore,
            Self::PropertyValue(_) => InputField::PropertyValue,
            Self::DownPayment(_) => InputField::DownPayment,
        }
    }
}

// ===== Assessment =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentOutcome {
    Approved,
    PreQualified,
    NeedsReview,
}

impl AssessmentOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::PreQualified => "Pre-qualified with Conditions",
            Self::NeedsReview => "Needs Manual Review",
        }
    }
}

impl fmt::Display for AssessmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Approved, Self::PreQualified, Self::NeedsReview]
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("unknown assessment outcome: {}", s))
    }
}

/// Ratios derived from the borrower's inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculatedMetrics {
    /// Debt-to-income ratio
    pub dti_ratio: f64,
    /// Loan-to-value ratio
    pub ltv_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub outcome: AssessmentOutcome,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResult {
    pub user_inputs: UserInputs,
    pub calculated_metrics: CalculatedMetrics,
    pub assessment: Assessment,
}

// ===== Conversation =====

/// Interview state machine steps
///
/// The stored step is the one that handles the next borrower message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterviewStep {
    Greeting,
    AwaitingConsent,
    Collecting(InputField),
    Complete,
}

impl InterviewStep {
    /// Step number as persisted (1-8)
    pub fn number(self) -> i32 {
        match self {
            Self::Greeting => 1,
            Self::AwaitingConsent => 2,
            Self::Collecting(field) => 3 + i32::from(field.position()),
            Self::Complete => 8,
        }
    }

    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            1 => Some(Self::Greeting),
            2 => Some(Self::AwaitingConsent),
            3..=7 => InputField::ORDER
                .get(usize::try_from(number - 3).ok()?)
                .copied()
                .map(Self::Collecting),
            8 => Some(Self::Complete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl ConversationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl FromStr for ConversationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            other => Err(format!("unknown conversation status: {}", other)),
        }
    }
}

/// A borrower interview session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// UUID v4 string
    pub id: String,
    /// Reserved for future user management
    pub user_id: Option<String>,
    pub status: ConversationStatus,
    pub current_step: InterviewStep,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Fresh in-progress conversation at the greeting step
    pub fn new(user_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            status: ConversationStatus::InProgress,
            current_step: InterviewStep::Greeting,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(format!("unknown message role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

// ===== Service results =====

/// Reply to a single borrower message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: String,
    pub conversation_complete: bool,
    /// Present on the turn that finishes the interview
    pub assessment_result: Option<AssessmentResult>,
}

/// Summary of an in-progress conversation that can be resumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSnapshot {
    pub conversation_id: String,
    pub current_step: InterviewStep,
    pub message_count: usize,
    pub last_message: Option<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers_round_trip_through_storage_values() {
        for number in 1..=8 {
            let step = InterviewStep::from_number(number).unwrap();
            assert_eq!(step.number(), number);
        }
        assert_eq!(InterviewStep::from_number(0), None);
        assert_eq!(InterviewStep::from_number(9), None);
        assert_eq!(
            InterviewStep::from_number(5),
            Some(InterviewStep::Collecting(InputField::CreditScore))
        );
    }

    #[test]
    fn next_missing_follows_collection_order() {
        let mut inputs = UserInputs::default();
        assert_eq!(inputs.next_missing(), Some(InputField::AnnualIncome));

        inputs.apply(CapturedInput::AnnualIncome(80_000.0));
        inputs.apply(CapturedInput::CreditScore(CreditScoreCategory::Good));
        assert_eq!(inputs.next_missing(), Some(InputField::MonthlyDebt));

        inputs.apply(CapturedInput::MonthlyDebt(0.0));
        inputs.apply(CapturedInput::PropertyValue(400_000.0));
        inputs.apply(CapturedInput::DownPayment(80_000.0));
        assert!(inputs.is_complete());
    }

    #[test]
    fn credit_category_parsing_is_lenient_about_case_and_punctuation() {
        assert_eq!("good".parse(), Ok(CreditScoreCategory::Good));
        assert_eq!(" Excellent. ".parse(), Ok(CreditScoreCategory::Excellent));
        assert!("INVALID".parse::<CreditScoreCategory>().is_err());
        assert!("Very good".parse::<CreditScoreCategory>().is_err());
    }

    #[test]
    fn new_conversation_starts_at_greeting() {
        let conversation = Conversation::new(None);
        assert_eq!(conversation.status, ConversationStatus::InProgress);
        assert_eq!(conversation.current_step, InterviewStep::Greeting);
        assert!(uuid::Uuid::parse_str(&conversation.id).is_ok());
    }
}
