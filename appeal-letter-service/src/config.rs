use std::str::FromStr;
use tracing::warn;

use crate::agent::{AgentSettings, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::models::GenerationVariant;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Process-level settings. The LLM credential is deliberately absent: callers
/// supply it with each request.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub log_format: LogFormat,
    pub model: String,
    pub temperature: f64,
    pub variant: GenerationVariant,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_format: LogFormat::Json,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            variant: GenerationVariant::Full,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values keep their default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        let variant = match lookup("APPEAL_VARIANT") {
            Some(raw) => GenerationVariant::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "unknown APPEAL_VARIANT, using default");
                defaults.variant
            }),
            None => defaults.variant,
        };

        Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            log_format,
            model: lookup("APPEAL_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.model),
            temperature: parse_or(&lookup, "APPEAL_TEMPERATURE", defaults.temperature),
            variant,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            ..AgentSettings::default()
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "could not parse setting, using default");
            default
        }),
        None => default,
    }
}
