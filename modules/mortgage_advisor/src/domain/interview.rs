//! Interview state machine
//!
//! One borrower message moves the interview by at most one step. The machine
//! itself is pure apart from the model calls; persisting the outcome of a
//! [`Turn`] is the service's job.

use super::assessment::perform_complete_assessment;
use super::extraction::{classify_consent, extract_input, Consent};
use super::llm::CompletionModel;
use super::prompts;
use crate::contract::{
    AssessmentResult, CapturedInput, Conversation, ConversationStatus, InputField, InterviewStep,
    UserInputs,
};

impl InterviewStep {
    /// Step that should handle the next message of a stored conversation.
    ///
    /// Past the consent step the collected inputs decide, not the stored
    /// number.
    pub fn resume(conversation: &Conversation, inputs: &UserInputs) -> Self {
        if conversation.status != ConversationStatus::InProgress {
            return Self::Complete;
        }
        match conversation.current_step {
            step @ (Self::Greeting | Self::AwaitingConsent) => step,
            _ => inputs
                .next_missing()
                .map_or(Self::Complete, Self::Collecting),
        }
    }
}

/// Outcome of feeding one message to the interview
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub reply: String,
    pub next: InterviewStep,
    /// Value to persist, if the message answered the current question
    pub captured: Option<CapturedInput>,
    pub assessment: Option<AssessmentResult>,
}

impl Turn {
    fn say(reply: impl Into<String>, next: InterviewStep) -> Self {
        Self {
            reply: reply.into(),
            next,
            captured: None,
            assessment: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next == InterviewStep::Complete
    }
}

pub struct Interview<'a> {
    model: &'a dyn CompletionModel,
}

impl<'a> Interview<'a> {
    pub fn new(model: &'a dyn CompletionModel) -> Self {
        Self { model }
    }

    /// Handle `message` at `step` given the inputs collected so far
    pub async fn advance(&self, step: InterviewStep, message: &str, inputs: &UserInputs) -> Turn {
        match step {
            InterviewStep::Greeting => Turn::say(prompts::GREETING, InterviewStep::AwaitingConsent),
            InterviewStep::AwaitingConsent => self.consent(message).await,
            InterviewStep::Collecting(field) => self.collect(field, message, inputs).await,
            InterviewStep::Complete => Turn::say(prompts::ALREADY_COMPLETE, InterviewStep::Complete),
        }
    }

    async fn consent(&self, message: &str) -> Turn {
        let consent = match classify_consent(self.model, message).await {
            Ok(consent) => consent,
            Err(e) => {
                tracing::warn!(error = %e, "Consent classification failed, proceeding");
                Consent::Proceed
            }
        };

        match consent {
            Consent::Proceed => Turn::say(
                prompts::PROCEED,
                InterviewStep::Collecting(InputField::AnnualIncome),
            ),
            Consent::Decline => Turn::say(prompts::DECLINE, InterviewStep::Complete),
            Consent::Unclear => Turn::say(prompts::CONSENT_UNCLEAR, InterviewStep::AwaitingConsent),
        }
    }

    async fn collect(&self, field: InputField, message: &str, inputs: &UserInputs) -> Turn {
        let captured = match extract_input(self.model, field, message).await {
            Ok(Some(captured)) => captured,
            Ok(None) => {
                tracing::info!(field = field.column(), "Answer not understood, asking again");
                return Turn::say(prompts::invalid_answer(field), InterviewStep::Collecting(field));
            }
            Err(e) => {
                tracing::warn!(field = field.column(), error = %e, "Extraction failed, asking again");
                return Turn::say(prompts::invalid_answer(field), InterviewStep::Collecting(field));
            }
        };

        let mut updated = inputs.clone();
        updated.apply(captured);

        let mut turn = match (field, updated.next_missing()) {
            (_, None) => match perform_complete_assessment(&updated) {
                Ok(result) => Turn {
                    reply: prompts::ASSESSMENT_READY.to_string(),
                    next: InterviewStep::Complete,
                    captured: None,
                    assessment: Some(result),
                },
                Err(e) => {
                    tracing::error!(error = %e, "Assessment failed on complete inputs");
                    Turn::say(prompts::PROCESSING_ERROR, InterviewStep::Collecting(field))
                }
            },
            (InputField::DownPayment, Some(missing)) => {
                Turn::say(prompts::MISSING_INFORMATION, InterviewStep::Collecting(missing))
            }
            (_, Some(missing)) => Turn::say(
                prompts::recorded(captured, missing),
                InterviewStep::Collecting(missing),
            ),
        };
        turn.captured = Some(captured);
        turn
    }
}
