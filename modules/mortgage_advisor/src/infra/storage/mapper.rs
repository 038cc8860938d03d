//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{conversation, message, user_input};
use crate::contract::{CapturedInput, Conversation, InterviewStep, Message, UserInputs};
use anyhow::anyhow;

// ===== Conversation Conversions =====

impl TryFrom<conversation::Model> for Conversation {
    type Error = anyhow::Error;

    fn try_from(entity: conversation::Model) -> Result<Self, Self::Error> {
        let current_step = InterviewStep::from_number(entity.current_step)
            .ok_or_else(|| anyhow!("invalid interview step {}", entity.current_step))?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            status: entity.status.parse().map_err(|e: String| anyhow!(e))?,
            current_step,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

impl From<&Conversation> for conversation::ActiveModel {
    fn from(model: &Conversation) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            id: Set(model.id.clone()),
            user_id: Set(model.user_id.clone()),
            status: Set(model.status.as_str().to_string()),
            current_step: Set(model.current_step.number()),
            created_at: Set(model.created_at),
            updated_at: Set(model.updated_at),
        }
    }
}

// ===== Message Conversions =====

impl TryFrom<message::Model> for Message {
    type Error = anyhow::Error;

    fn try_from(entity: message::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            role: entity.role.parse().map_err(|e: String| anyhow!(e))?,
            content: entity.content,
            timestamp: entity.timestamp,
        })
    }
}

// ===== User Input Conversions =====

impl TryFrom<user_input::Model> for UserInputs {
    type Error = anyhow::Error;

    fn try_from(entity: user_input::Model) -> Result<Self, Self::Error> {
        let credit_score_category = entity
            .credit_score_category
            .map(|c| c.parse().map_err(|e: String| anyhow!(e)))
            .transpose()?;

        Ok(Self {
            annual_income: entity.annual_income,
            monthly_debt: entity.monthly_debt,
            credit_score_category,
            property_value: entity.property_value,
            down_payment: entity.down_payment,
        })
    }
}

/// Set the column for one captured value
pub fn apply_captured(active: &mut user_input::ActiveModel, input: CapturedInput) {
    use sea_orm::ActiveValue::Set;

    match input {
        CapturedInput::AnnualIncome(v) => active.annual_income = Set(Some(v)),
        CapturedInput::MonthlyDebt(v) => active.monthly_debt = Set(Some(v)),
        CapturedInput::CreditScore(c) => {
            active.credit_score_category = Set(Some(c.as_str().to_string()))
        }
        CapturedInput::PropertyValue(v) => active.property_value = Set(Some(v)),
        CapturedInput::DownPayment(v) => active.down_payment = Set(Some(v)),
    }
}
