use serde::{Deserialize, Serialize};

/// Source tag attached to every lead captured by the widget.
pub const LEAD_SOURCE: &str = "chat_widget";

/// One completed user/bot exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub bot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Turn {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
            intent: None,
            timestamp: None,
        }
    }

    /// Completes a turn from the user text and the reply that answered it.
    pub fn from_reply(user: impl Into<String>, reply: &ChatReply) -> Self {
        Self {
            user: user.into(),
            bot: reply.response.clone(),
            intent: reply.intent.clone(),
            timestamp: reply.timestamp.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Parsed body of a successful chat response. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub lead_prompt: bool,
}

impl ChatReply {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            intent: None,
            timestamp: None,
            lead_prompt: false,
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_lead_prompt(mut self) -> Self {
        self.lead_prompt = true;
        self
    }
}

/// Lead payload posted to the lead endpoint. Built per submission and dropped after sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
    pub source: &'static str,
    pub conversation_context: Vec<Turn>,
}

/// Lenient view of the lead endpoint acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LeadAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Lenient view of the health endpoint payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
