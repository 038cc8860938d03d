//! Common test utilities: in-memory repositories and a scripted model
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mortgage_advisor::contract::*;
use mortgage_advisor::domain::repository::{
    ConversationRepository, MessageRepository, UserInputRepository,
};
use mortgage_advisor::domain::{CompletionModel, Service};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub fn print_test_header(test_name: &str, purpose: &str) {
    println!("\n🧪 TEST: {}", test_name);
    println!("📋 PURPOSE: {}", purpose);
}

// ===== Scripted model =====

/// Answers prompts from a queue; an exhausted queue or an `Err` entry fails the call
#[derive(Clone, Default)]
pub struct ScriptedModel {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let model = Self::default();
        for response in responses {
            model.push(response);
        }
        model
    }

    pub fn push(&self, response: impl Into<String>) {
        self.responses.lock().push_back(Ok(response.into()));
    }

    pub fn push_failure(&self, reason: impl Into<String>) {
        self.responses.lock().push_back(Err(reason.into()));
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().push(prompt.to_string());
        match self.responses.lock().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
            None => Err(anyhow::anyhow!("no scripted response left")),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

// ===== Mock repositories =====

#[derive(Clone, Default)]
pub struct MockConversationRepo {
    data: Arc<RwLock<HashMap<String, Conversation>>>,
}

impl MockConversationRepo {
    pub fn get(&self, id: &str) -> Option<Conversation> {
        self.data.read().get(id).cloned()
    }

    pub fn count(&self) -> usize {
        self.data.read().len()
    }

    /// Backdate a conversation's last activity
    pub fn set_updated_at(&self, id: &str, updated_at: DateTime<Utc>) {
        if let Some(conversation) = self.data.write().get_mut(id) {
            conversation.updated_at = updated_at;
        }
    }
}

#[async_trait]
impl ConversationRepository for MockConversationRepo {
    async fn create(&self, conversation: &Conversation) -> anyhow::Result<Conversation> {
        self.data
            .write()
            .insert(conversation.id.clone(), conversation.clone());
        Ok(conversation.clone())
    }

    async fn find(&self, id: &str) -> anyhow::Result<Option<Conversation>> {
        Ok(self.get(id))
    }

    async fn update_step(&self, id: &str, step: InterviewStep) -> anyhow::Result<bool> {
        Ok(match self.data.write().get_mut(id) {
            Some(conversation) => {
                conversation.current_step = step;
                conversation.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn complete(&self, id: &str) -> anyhow::Result<bool> {
        Ok(match self.data.write().get_mut(id) {
            Some(conversation) => {
                conversation.status = ConversationStatus::Completed;
                conversation.current_step = InterviewStep::Complete;
                conversation.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn abandon_stale(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut count = 0;
        for conversation in self.data.write().values_mut() {
            if conversation.status == ConversationStatus::InProgress
                && conversation.updated_at < cutoff
            {
                conversation.status = ConversationStatus::Abandoned;
                count += 1;
            }
        }
        Ok(count)
    }
}

#[derive(Clone, Default)]
pub struct MockMessageRepo {
    data: Arc<RwLock<HashMap<String, Vec<Message>>>>,
}

#[async_trait]
impl MessageRepository for MockMessageRepo {
    async fn add(
        &self,
        conversation_id: &str,
        role: MessageRole,
        content: &str,
    ) -> anyhow::Result<Message> {
        let message = Message {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        };
        self.data
            .write()
            .entry(conversation_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn list(&self, conversation_id: &str) -> anyhow::Result<Vec<Message>> {
        Ok(self
            .data
            .read()
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Clone, Default)]
pub struct MockUserInputRepo {
    data: Arc<RwLock<HashMap<String, UserInputs>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MockUserInputRepo {
    pub fn get(&self, conversation_id: &str) -> Option<UserInputs> {
        self.data.read().get(conversation_id).cloned()
    }

    /// Make every `record` call fail
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserInputRepository for MockUserInputRepo {
    async fn find(&self, conversation_id: &str) -> anyhow::Result<Option<UserInputs>> {
        Ok(self.get(conversation_id))
    }

    async fn record(
        &self,
        conversation_id: &str,
        input: CapturedInput,
    ) -> anyhow::Result<UserInputs> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("storage unavailable");
        }
        let mut data = self.data.write();
        let inputs = data.entry(conversation_id.to_string()).or_default();
        inputs.apply(input);
        Ok(inputs.clone())
    }
}

// ===== Service builders =====

pub struct TestRepos {
    pub conversations: MockConversationRepo,
    pub messages: MockMessageRepo,
    pub inputs: MockUserInputRepo,
}

pub const TEST_MAX_MESSAGE_LENGTH: usize = 2000;

pub fn create_test_service_with_repos(model: Option<ScriptedModel>) -> (Arc<Service>, TestRepos) {
    let repos = TestRepos {
        conversations: MockConversationRepo::default(),
        messages: MockMessageRepo::default(),
        inputs: MockUserInputRepo::default(),
    };

    let service = Service::new(
        Arc::new(repos.conversations.clone()),
        Arc::new(repos.messages.clone()),
        Arc::new(repos.inputs.clone()),
        model.map(|m| Arc::new(m) as Arc<dyn CompletionModel>),
        TEST_MAX_MESSAGE_LENGTH,
    );

    (Arc::new(service), repos)
}

pub fn create_test_service(model: ScriptedModel) -> Arc<Service> {
    create_test_service_with_repos(Some(model)).0
}

/// Model answers for a full interview: consent, then the five inputs
pub fn happy_path_answers() -> Vec<&'static str> {
    vec!["PROCEED", "80000", "1500", "Good", "400000", "85000"]
}

/// Borrower messages matching `happy_path_answers`, after the opening hello
pub fn happy_path_messages() -> Vec<&'static str> {
    vec![
        "yes, let's do it",
        "I make 80k a year",
        "about $1,500 a month",
        "my credit is good",
        "the house costs 400k",
        "I can put down 85k",
    ]
}
