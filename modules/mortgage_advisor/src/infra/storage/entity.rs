//! SeaORM entities for database tables

/// Conversations table
pub mod conversation {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "conversations")]
    pub struct Model {
        /// UUID v4 string
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,

        pub user_id: Option<String>,

        /// `in_progress`, `completed` or `abandoned`
        pub status: String,

        /// Step (1-8) that handles the next message
        pub current_step: i32,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::message::Entity")]
        Messages,
        #[sea_orm(has_one = "super::user_input::Entity")]
        UserInputs,
    }

    impl Related<super::message::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Messages.def()
        }
    }

    impl Related<super::user_input::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::UserInputs.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Messages table, ordered by `id`
pub mod message {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "messages")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub conversation_id: String,

        /// `user` or `assistant`
        pub role: String,

        #[sea_orm(column_type = "Text")]
        pub content: String,

        pub timestamp: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::conversation::Entity",
            from = "Column::ConversationId",
            to = "super::conversation::Column::Id"
        )]
        Conversation,
    }

    impl Related<super::conversation::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Conversation.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Collected borrower inputs, one row per conversation
pub mod user_input {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "user_inputs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub conversation_id: String,

        pub annual_income: Option<f64>,

        pub monthly_debt: Option<f64>,

        pub credit_score_category: Option<String>,

        pub property_value: Option<f64>,

        pub down_payment: Option<f64>,

        pub created_at: DateTimeUtc,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::conversation::Entity",
            from = "Column::ConversationId",
            to = "super::conversation::Column::Id"
        )]
        Conversation,
    }

    impl Related<super::conversation::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Conversation.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
