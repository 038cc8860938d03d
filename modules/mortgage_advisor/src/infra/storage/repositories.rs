//! SeaORM repository implementations

use crate::contract::{
    CapturedInput, Conversation, ConversationStatus, InterviewStep, Message, MessageRole,
    UserInputs,
};
use crate::domain::repository::{
    ConversationRepository, MessageRepository, UserInputRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use super::entity::{conversation, message, user_input};
use super::mapper::apply_captured;

// ===== Conversation Repository =====

pub struct SeaOrmConversationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmConversationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationRepository for SeaOrmConversationRepository {
    async fn create(&self, conversation: &Conversation) -> Result<Conversation> {
        let active: conversation::ActiveModel = conversation.into();
        let created = active.insert(&*self.db).await?;
        created.try_into()
    }

    async fn find(&self, id: &str) -> Result<Option<Conversation>> {
        conversation::Entity::find_by_id(id.to_string())
            .one(&*self.db)
            .await?
            .map(Conversation::try_from)
            .transpose()
    }

    async fn update_step(&self, id: &str, step: InterviewStep) -> Result<bool> {
        let result = conversation::Entity::update_many()
            .col_expr(conversation::Column::CurrentStep, Expr::value(step.number()))
            .col_expr(conversation::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(conversation::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn complete(&self, id: &str) -> Result<bool> {
        let result = conversation::Entity::update_many()
            .col_expr(
                conversation::Column::Status,
                Expr::value(ConversationStatus::Completed.as_str()),
            )
            .col_expr(
                conversation::Column::CurrentStep,
                Expr::value(InterviewStep::Complete.number()),
            )
            .col_expr(conversation::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(conversation::Column::Id.eq(id))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn abandon_stale(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = conversation::Entity::update_many()
            .col_expr(
                conversation::Column::Status,
                Expr::value(ConversationStatus::Abandoned.as_str()),
            )
            .col_expr(conversation::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(conversation::Column::Status.eq(ConversationStatus::InProgress.as_str()))
            .filter(conversation::Column::UpdatedAt.lt(cutoff))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

// ===== Message Repository =====

pub struct SeaOrmMessageRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmMessageRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for SeaOrmMessageRepository {
    async fn add(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Message> {
        use sea_orm::ActiveValue::{NotSet, Set};

        let active = message::ActiveModel {
            id: NotSet,
            conversation_id: Set(conversation_id.to_string()),
            role: Set(role.as_str().to_string()),
            content: Set(content.to_string()),
            timestamp: Set(Utc::now()),
        };

        active.insert(&*self.db).await?.try_into()
    }

    async fn list(&self, conversation_id: &str) -> Result<Vec<Message>> {
        message::Entity::find()
            .filter(message::Column::ConversationId.eq(conversation_id))
            .order_by_asc(message::Column::Id)
            .all(&*self.db)
            .await?
            .into_iter()
            .map(Message::try_from)
            .collect()
    }
}

// ===== User Input Repository =====

pub struct SeaOrmUserInputRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserInputRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserInputRepository for SeaOrmUserInputRepository {
    async fn find(&self, conversation_id: &str) -> Result<Option<UserInputs>> {
        user_input::Entity::find_by_id(conversation_id.to_string())
            .one(&*self.db)
            .await?
            .map(UserInputs::try_from)
            .transpose()
    }

    async fn record(&self, conversation_id: &str, input: CapturedInput) -> Result<UserInputs> {
        use sea_orm::ActiveValue::{NotSet, Set};

        let now = Utc::now();
        let existing = user_input::Entity::find_by_id(conversation_id.to_string())
            .one(&*self.db)
            .await?;

        let saved = match existing {
            Some(row) => {
                let mut active: user_input::ActiveModel = row.into();
                apply_captured(&mut active, input);
                active.updated_at = Set(now);
                active.update(&*self.db).await?
            }
            None => {
                let mut active = user_input::ActiveModel {
                    conversation_id: Set(conversation_id.to_string()),
                    annual_income: NotSet,
                    monthly_debt: NotSet,
                    credit_score_category: NotSet,
                    property_value: NotSet,
                    down_payment: NotSet,
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                apply_captured(&mut active, input);
                active.insert(&*self.db).await?
            }
        };

        saved.try_into()
    }
}
