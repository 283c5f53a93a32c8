use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::{Completion, CompletionRequest, TextGenerator};

/// A client for any OpenAI compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_base: String, api_key: String) -> OpenAiClient {
        OpenAiClient {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

fn build_request(request: &CompletionRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &request.model,
        messages: [
            ChatMessage {
                role: "system",
                content: &request.system,
            },
            ChatMessage {
                role: "user",
                content: &request.user,
            },
        ],
        response_format: request.structured.then(|| ResponseFormat {
            kind: "json_object",
        }),
    }
}

fn parse_completion(response: ChatResponse, structured: bool) -> Result<Completion, Error> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::MalformedGenerationResponse("no completion choices".into()))?;

    if structured {
        let value = serde_json::from_str(&content)
            .map_err(|err| Error::MalformedGenerationResponse(err.to_string()))?;
        Ok(Completion::Structured(value))
    } else {
        Ok(Completion::Text(content))
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    #[tracing::instrument(skip(self, request), fields(model = %request.model, structured = request.structured))]
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, Error> {
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&build_request(request))
            .send()
            .await?;
        let response = response.error_for_status()?;

        let body: ChatResponse = response.json().await?;

        parse_completion(body, request.structured)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: serde_json::Value) -> ChatResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn structured_requests_ask_for_a_json_object() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".into(),
            system: "be creative".into(),
            user: "a brief".into(),
            structured: true,
        };

        let body = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "a brief");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn plain_requests_omit_response_format() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".into(),
            system: "direct".into(),
            user: "a persona".into(),
            structured: false,
        };

        let body = serde_json::to_value(build_request(&request)).unwrap();

        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn first_choice_content_is_used() {
        let body = response(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "A sunlit kitchen." } },
                { "message": { "role": "assistant", "content": "ignored" } },
            ]
        }));

        let completion = parse_completion(body, false).unwrap();

        assert_eq!(completion, Completion::Text("A sunlit kitchen.".into()));
    }

    #[test]
    fn structured_content_is_parsed_as_json() {
        let body = response(json!({
            "choices": [{ "message": { "content": "{\"mood_and_tone\": \"calm\"}" } }]
        }));

        let completion = parse_completion(body, true).unwrap();

        assert_eq!(
            completion,
            Completion::Structured(json!({ "mood_and_tone": "calm" }))
        );
    }

    #[test]
    fn empty_choices_are_malformed() {
        let body = response(json!({ "choices": [] }));

        let result = parse_completion(body, true);

        assert!(matches!(result, Err(Error::MalformedGenerationResponse(_))));
    }

    #[test]
    fn unparseable_structured_content_is_malformed() {
        let body = response(json!({
            "choices": [{ "message": { "content": "not json at all" } }]
        }));

        let result = parse_completion(body, true);

        assert!(matches!(result, Err(Error::MalformedGenerationResponse(_))));
    }
}
