use std::sync::Arc;
use std::time::Duration;

use chatline_transport::{ChatBackend, FailureKind, Turn};

use super::format::format_message;
use super::message::Sender;
use crate::lead::LeadFlow;
use crate::session::WidgetSession;
use crate::settings::ContactSettings;
use crate::view::WidgetView;

/// Why a submit was dropped without touching the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    /// Another exchange is in flight.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Replied {
        turn: Turn,
        lead_prompt_scheduled: bool,
    },
    Failed(FailureKind),
    Ignored(IgnoreReason),
}

/// Bot text shown in place of a reply when the exchange fails.
pub fn chat_fallback(kind: FailureKind, contacts: &ContactSettings) -> String {
    match kind {
        FailureKind::Backend => format!(
            "I'm having trouble right now. Please try again or contact us at {}",
            contacts.email
        ),
        FailureKind::Transport => format!(
            "I'm unable to connect right now. Please check your connection or contact us at {}",
            contacts.phone
        ),
    }
}

/// Drives one user message through the backend and into the transcript.
pub struct ChatFlow {
    backend: Arc<dyn ChatBackend>,
    session: WidgetSession,
    view: Arc<dyn WidgetView>,
    lead: Arc<LeadFlow>,
    contacts: ContactSettings,
    lead_prompt_delay: Duration,
}

impl ChatFlow {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        session: WidgetSession,
        view: Arc<dyn WidgetView>,
        lead: Arc<LeadFlow>,
        contacts: ContactSettings,
        lead_prompt_delay: Duration,
    ) -> Self {
        Self {
            backend,
            session,
            view,
            lead,
            contacts,
            lead_prompt_delay,
        }
    }

    /// Sends `raw_input` as one exchange.
    ///
    /// Blank input and submits made while an exchange is in flight are dropped.
    pub async fn submit(&self, raw_input: &str) -> SubmitOutcome {
        let text = raw_input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let Some(exchange_id) = self.session.begin_exchange(text).await else {
            tracing::debug!("exchange in flight, dropping submit");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        self.view.append_message(Sender::User, &format_message(text));
        self.view.clear_input();
        if self.session.hide_quick_actions().await {
            self.view.hide_quick_actions();
        }
        self.view.set_typing(true);

        let result = self.backend.send_chat_message(text).await;
        self.view.set_typing(false);

        match result {
            Ok(reply) => {
                self.view
                    .append_message(Sender::Bot, &format_message(&reply.response));

                let turn = Turn::from_reply(text, &reply);
                self.session.complete_exchange(exchange_id, turn.clone()).await;
                tracing::debug!(
                    exchange = exchange_id.0,
                    intent = reply.intent.as_deref().unwrap_or("unknown"),
                    "chat reply recorded"
                );

                if reply.lead_prompt {
                    self.schedule_lead_prompt();
                }

                SubmitOutcome::Replied {
                    turn,
                    lead_prompt_scheduled: reply.lead_prompt,
                }
            }
            Err(error) => {
                let kind = error.kind();
                tracing::warn!(
                    exchange = exchange_id.0,
                    stage = error.stage(),
                    ?kind,
                    %error,
                    "chat exchange failed"
                );

                self.view
                    .append_message(Sender::Bot, &chat_fallback(kind, &self.contacts));
                self.session.fail_exchange(exchange_id, kind).await;
                SubmitOutcome::Failed(kind)
            }
        }
    }

    fn schedule_lead_prompt(&self) {
        let lead = Arc::clone(&self.lead);
        let delay = self.lead_prompt_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lead.show_prompt().await;
        });
    }
}
