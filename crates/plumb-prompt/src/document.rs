//! Chat document types, serialized in the OpenAI chat-completions shape.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One part of a multimodal user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

/// Shape the service is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// A composed instruction document: system instructions plus the user's
/// content parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptDocument {
    pub system: String,
    pub user: Vec<ContentPart>,
    pub response_format: ResponseFormat,
}

impl PromptDocument {
    /// System message followed by the multimodal user message.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: Role::System,
                content: MessageContent::Text(self.system.clone()),
            },
            ChatMessage {
                role: Role::User,
                content: MessageContent::Parts(self.user.clone()),
            },
        ]
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.user
            .iter()
            .any(|part| matches!(part, ContentPart::ImageUrl { .. }))
    }

    #[must_use]
    pub const fn wants_json(&self) -> bool {
        matches!(self.response_format, ResponseFormat::JsonObject)
    }

    /// Concatenated text parts of the user message.
    #[must_use]
    pub fn user_text(&self) -> String {
        self.user
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::ImageUrl { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parts_serialize_in_chat_completion_shape() {
        let parts = vec![
            ContentPart::Text { text: "hi".into() },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: "data:image/png;base64,AA==".into(),
                },
            },
        ];
        assert_eq!(
            serde_json::to_value(&parts).unwrap(),
            json!([
                {"type": "text", "text": "hi"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AA=="}}
            ])
        );
    }

    #[test]
    fn system_message_content_is_plain_string() {
        let doc = PromptDocument {
            system: "persona".into(),
            user: vec![ContentPart::Text { text: "facts".into() }],
            response_format: ResponseFormat::Text,
        };
        let messages = serde_json::to_value(doc.messages()).unwrap();
        assert_eq!(messages[0], json!({"role": "system", "content": "persona"}));
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"][0]["type"], "text");
    }
}
