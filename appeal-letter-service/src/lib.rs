pub mod agent;
pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod service;
pub mod tasks;
pub mod telemetry;
pub mod workflow;

pub use agent::{AgentProvider, AgentSettings, ChatModel, OpenRouterProvider};
pub use config::ServiceConfig;
pub use error::{AppealError, MissingInput};
pub use models::*;
pub use pipeline::AppealPipeline;
pub use service::{AppState, build_router, create_app};
pub use workflow::build_appeal_workflow;
