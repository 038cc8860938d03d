//! Mapper implementations for converting between DTOs and contract models

use super::dto::*;
use crate::contract;

// ===== Chat conversions =====

impl From<contract::ChatReply> for ChatResponse {
    fn from(reply: contract::ChatReply) -> Self {
        Self {
            response: reply.response,
            conversation_id: reply.conversation_id,
            conversation_complete: reply.conversation_complete,
            assessment_result: reply.assessment_result.map(Into::into),
        }
    }
}

impl TryFrom<ChatResponse> for contract::ChatReply {
    type Error = String;

    fn try_from(dto: ChatResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            response: dto.response,
            conversation_id: dto.conversation_id,
            conversation_complete: dto.conversation_complete,
            assessment_result: dto.assessment_result.map(TryInto::try_into).transpose()?,
        })
    }
}

// ===== Assessment conversions =====

impl From<contract::UserInputs> for UserInputsDto {
    fn from(inputs: contract::UserInputs) -> Self {
        Self {
            annual_income: inputs.annual_income,
            monthly_debt: inputs.monthly_debt,
            credit_score_category: inputs
                .credit_score_category
                .map(|c| c.as_str().to_string()),
            property_value: inputs.property_value,
            down_payment: inputs.down_payment,
        }
    }
}

impl TryFrom<UserInputsDto> for contract::UserInputs {
    type Error = String;

    fn try_from(dto: UserInputsDto) -> Result<Self, Self::Error> {
        Ok(Self {
            annual_income: dto.annual_income,
            monthly_debt: dto.monthly_debt,
            credit_score_category: dto
                .credit_score_category
                .map(|c| c.parse())
                .transpose()?,
            property_value: dto.property_value,
            down_payment: dto.down_payment,
        })
    }
}

impl From<contract::AssessmentResult> for AssessmentResultDto {
    fn from(result: contract::AssessmentResult) -> Self {
        Self {
            user_inputs: result.user_inputs.into(),
            calculated_metrics: CalculatedMetricsDto {
                dti_ratio: result.calculated_metrics.dti_ratio,
                ltv_ratio: result.calculated_metrics.ltv_ratio,
            },
            assessment: AssessmentDto {
                outcome: result.assessment.outcome.as_str().to_string(),
                notes: result.assessment.notes,
            },
        }
    }
}

impl TryFrom<AssessmentResultDto> for contract::AssessmentResult {
    type Error = String;

    fn try_from(dto: AssessmentResultDto) -> Result<Self, Self::Error> {
        Ok(Self {
            user_inputs: dto.user_inputs.try_into()?,
            calculated_metrics: contract::CalculatedMetrics {
                dti_ratio: dto.calculated_metrics.dti_ratio,
                ltv_ratio: dto.calculated_metrics.ltv_ratio,
            },
            assessment: contract::Assessment {
                outcome: dto.assessment.outcome.parse()?,
                notes: dto.assessment.notes,
            },
        })
    }
}

// ===== Conversation conversions =====

impl From<contract::Message> for MessageDto {
    fn from(message: contract::Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

impl TryFrom<MessageDto> for contract::Message {
    type Error = String;

    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        Ok(Self {
            role: dto.role.parse()?,
            content: dto.content,
            timestamp: dto.timestamp,
        })
    }
}

impl From<contract::ConversationSnapshot> for ConversationSnapshotDto {
    fn from(snapshot: contract::ConversationSnapshot) -> Self {
        Self {
            conversation_id: snapshot.conversation_id,
            current_step: snapshot.current_step.number(),
            message_count: snapshot.message_count,
            last_message: snapshot.last_message.map(Into::into),
        }
    }
}

impl TryFrom<ConversationSnapshotDto> for contract::ConversationSnapshot {
    type Error = String;

    fn try_from(dto: ConversationSnapshotDto) -> Result<Self, Self::Error> {
        Ok(Self {
            conversation_id: dto.conversation_id,
            current_step: contract::InterviewStep::from_number(dto.current_step)
                .ok_or_else(|| format!("invalid interview step {}", dto.current_step))?,
            message_count: dto.message_count,
            last_message: dto.last_message.map(TryInto::try_into).transpose()?,
        })
    }
}
