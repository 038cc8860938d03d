//! Database migrations for the mortgage advisor

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250115_000001_create_conversations::Migration),
            Box::new(m20250115_000002_create_messages::Migration),
            Box::new(m20250115_000003_create_user_inputs::Migration),
        ]
    }
}

// Explicit names: the derive would take the file stem for all three
mod m20250115_000001_create_conversations {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250115_000001_create_conversations"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Conversations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Conversations::Id)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Conversations::UserId).string())
                        .col(
                            ColumnDef::new(Conversations::Status)
                                .string()
                                .not_null()
                                .default("in_progress"),
                        )
                        .col(
                            ColumnDef::new(Conversations::CurrentStep)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Conversations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Conversations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // Stale sweep filters on status + updated_at
            manager
                .create_index(
                    Index::create()
                        .name("idx_conversations_status_updated_at")
                        .table(Conversations::Table)
                        .col(Conversations::Status)
                        .col(Conversations::UpdatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Conversations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Conversations {
        Table,
        Id,
        UserId,
        Status,
        CurrentStep,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250115_000002_create_messages {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250115_000002_create_messages"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Messages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Messages::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Messages::ConversationId).string().not_null())
                        .col(ColumnDef::new(Messages::Role).string().not_null())
                        .col(ColumnDef::new(Messages::Content).text().not_null())
                        .col(
                            ColumnDef::new(Messages::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_messages_conversation")
                                .from(Messages::Table, Messages::ConversationId)
                                .to(Conversations::Table, Conversations::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_messages_conversation_id")
                        .table(Messages::Table)
                        .col(Messages::ConversationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Messages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Messages {
        Table,
        Id,
        ConversationId,
        Role,
        Content,
        Timestamp,
    }

    #[derive(DeriveIden)]
    enum Conversations {
        Table,
        Id,
    }
}

mod m20250115_000003_create_user_inputs {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250115_000003_create_user_inputs"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(UserInputs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UserInputs::ConversationId)
                                .string()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(UserInputs::AnnualIncome).double())
                        .col(ColumnDef::new(UserInputs::MonthlyDebt).double())
                        .col(ColumnDef::new(UserInputs::CreditScoreCategory).string())
                        .col(ColumnDef::new(UserInputs::PropertyValue).double())
                        .col(ColumnDef::new(UserInputs::DownPayment).double())
                        .col(
                            ColumnDef::new(UserInputs::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(UserInputs::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_user_inputs_conversation")
                                .from(UserInputs::Table, UserInputs::ConversationId)
                                .to(Conversations::Table, Conversations::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UserInputs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum UserInputs {
        Table,
        ConversationId,
        AnnualIncome,
        MonthlyDebt,
        CreditScoreCategory,
        PropertyValue,
        DownPayment,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Conversations {
        Table,
        Id,
    }
}
