use async_trait::async_trait;
use graph_flow::Context;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Chat,
    providers::openrouter,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::error::AppealError;

pub const DEFAULT_MODEL: &str = "openai/gpt-4";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

const APPEAL_PREAMBLE: &str = "You are an assistant that helps patients contest health insurance claim denials. \
You write clear, factual and professional correspondence grounded only in the documents you are given.";

/// A chat-completion backend.
///
/// Implementations read whatever earlier turns they need from the context's
/// chat history; they never write to it.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, prompt: &str, context: &Context) -> anyhow::Result<String>;
}

/// Builds a [`ChatModel`] from a caller-supplied credential
pub trait AgentProvider: Send + Sync {
    fn connect(&self, credential: &str) -> Result<Arc<dyn ChatModel>, AppealError>;
}

#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model: String,
    pub temperature: f64,
    pub preamble: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            preamble: APPEAL_PREAMBLE.to_string(),
        }
    }
}

/// Chat models served through OpenRouter
pub struct OpenRouterProvider {
    settings: AgentSettings,
}

impl OpenRouterProvider {
    pub fn new(settings: AgentSettings) -> Self {
        Self { settings }
    }
}

impl AgentProvider for OpenRouterProvider {
    fn connect(&self, credential: &str) -> Result<Arc<dyn ChatModel>, AppealError> {
        validate_credential(credential)?;
        validate_settings(&self.settings)?;

        let client = openrouter::Client::new(credential.trim());
        let agent = client
            .agent(&self.settings.model)
            .preamble(&self.settings.preamble)
            .temperature(self.settings.temperature)
            .build();

        info!(model = %self.settings.model, "chat agent initialized");
        Ok(Arc::new(RigChatModel { agent }))
    }
}

/// The key ends up in an Authorization header, so it has to be printable ASCII
fn validate_credential(credential: &str) -> Result<(), AppealError> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(AppealError::AgentInit("API key is empty".to_string()));
    }
    if !credential.chars().all(|c| c.is_ascii_graphic()) {
        return Err(AppealError::AgentInit(
            "API key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_settings(settings: &AgentSettings) -> Result<(), AppealError> {
    if settings.model.trim().is_empty() {
        return Err(AppealError::AgentInit("no model configured".to_string()));
    }
    if !(0.0..=2.0).contains(&settings.temperature) {
        return Err(AppealError::AgentInit(format!(
            "temperature {} is outside 0.0..=2.0",
            settings.temperature
        )));
    }
    Ok(())
}

struct RigChatModel {
    agent: Agent<openrouter::CompletionModel>,
}

#[async_trait]
impl ChatModel for RigChatModel {
    async fn chat(&self, prompt: &str, context: &Context) -> anyhow::Result<String> {
        let history = context.get_rig_messages().await;
        let response = self.agent.chat(prompt, history).await?;
        Ok(response)
    }
}

/// Send one prompt with the run's transcript as context, then record the
/// exchange. Failed calls leave the transcript untouched.
pub async fn converse(
    model: &dyn ChatModel,
    context: &Context,
    step: &str,
    prompt: &str,
) -> Result<String, AppealError> {
    let history_turns = context.chat_history_len().await;
    info!(
        step,
        prompt_chars = prompt.len(),
        history_turns,
        "calling chat model"
    );

    let reply = model.chat(prompt, context).await.map_err(|e| {
        error!(step, error = %e, "chat model call failed");
        AppealError::AgentInvocation {
            step: step.to_string(),
            reason: e.to_string(),
        }
    })?;

    context.add_user_message(prompt).await;
    context.add_assistant_message(reply.clone()).await;

    info!(step, reply_chars = reply.len(), "chat model replied");
    Ok(reply)
}
