//! Text generation that turns a campaign into a creative persona and a video
//! prompt.
//!
//! The generator is a collaborator behind [`TextGenerator`] so the workflow in
//! [`manager`] can run against any chat-completions compatible backend, or a
//! scripted one in tests. When no API key is configured the service is
//! disabled and generation requests fail with
//! [`Error::GenerationNotConfigured`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::campaign::CreativePersona;
use crate::config::GenerationConfig;
use crate::error::Error;

pub mod manager;
pub mod openai;
pub mod prompts;

pub use openai::OpenAiClient;

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    /// Asks the backend to reply with a single JSON object.
    pub structured: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    Structured(Value),
    Text(String),
}

impl Completion {
    pub fn into_persona(self) -> Result<CreativePersona, Error> {
        let value = match self {
            Completion::Structured(value) => value,
            Completion::Text(text) => serde_json::from_str(&text)
                .map_err(|err| Error::MalformedGenerationResponse(err.to_string()))?,
        };

        match value {
            Value::Object(persona) => Ok(persona),
            other => Err(Error::MalformedGenerationResponse(format!(
                "expected a json object, got: {}",
                other
            ))),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::Structured(value) => value.to_string(),
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, Error>;
}

#[derive(Clone)]
pub struct GenerationService {
    generator: Option<Arc<dyn TextGenerator>>,
    model: String,
}

impl GenerationService {
    pub fn new(config: &GenerationConfig) -> GenerationService {
        match &config.openai_api_key {
            Some(api_key) => {
                let client = OpenAiClient::new(config.openai_api_base.clone(), api_key.clone());
                tracing::info!(model = %config.openai_model, "text generation enabled");
                GenerationService::with_generator(Arc::new(client), config.openai_model.clone())
            }
            None => {
                tracing::warn!("no OpenAI API key configured, text generation disabled");
                GenerationService {
                    generator: None,
                    model: config.openai_model.clone(),
                }
            }
        }
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>, model: String) -> GenerationService {
        GenerationService {
            generator: Some(generator),
            model,
        }
    }

    pub fn disabled() -> GenerationService {
        GenerationService {
            generator: None,
            model: String::new(),
        }
    }

    pub fn completions_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub fn generator(&self) -> Result<&dyn TextGenerator, Error> {
        self.generator
            .as_deref()
            .ok_or(Error::GenerationNotConfigured)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GenerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationService")
            .field("enabled", &self.completions_enabled())
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
pub mod test {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replies with queued completions in order and records every request.
    pub struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<Completion, Error>>>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedGenerator {
        pub fn new(responses: Vec<Result<Completion, Error>>) -> ScriptedGenerator {
            ScriptedGenerator {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn complete(&self, request: &CompletionRequest) -> Result<Completion, Error> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted completion left")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_object_becomes_persona() {
        let completion = Completion::Structured(json!({ "setting": "a rooftop garden" }));

        let persona = completion.into_persona().unwrap();

        assert_eq!(persona["setting"], "a rooftop garden");
    }

    #[test]
    fn json_text_is_parsed_into_persona() {
        let completion = Completion::Text(r#"{ "pacing": "fast" }"#.into());

        let persona = completion.into_persona().unwrap();

        assert_eq!(persona["pacing"], "fast");
    }

    #[test]
    fn non_object_reply_is_malformed() {
        let array = Completion::Structured(json!(["setting"])).into_persona();
        let prose = Completion::Text("Here is your persona!".into()).into_persona();

        assert!(matches!(array, Err(Error::MalformedGenerationResponse(_))));
        assert!(matches!(prose, Err(Error::MalformedGenerationResponse(_))));
    }

    #[test]
    fn disabled_service_rejects_generation() {
        let service = GenerationService::disabled();

        assert!(!service.completions_enabled());
        assert_eq!(
            service.generator().err(),
            Some(Error::GenerationNotConfigured)
        );
    }
}
