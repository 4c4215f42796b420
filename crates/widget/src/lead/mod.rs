use std::sync::Arc;

use chatline_transport::{ChatBackend, FailureKind, LEAD_SOURCE, LeadSubmission, Turn};

use crate::chat::Sender;
use crate::session::WidgetSession;
use crate::settings::ContactSettings;
use crate::view::WidgetView;

/// Turns attached to a lead as conversation context.
pub const LEAD_CONTEXT_TURNS: usize = 5;

pub const LEAD_INVITATION: &str = "I'd love to connect you with our team for personalized \
assistance. Would you like to share your contact details for a callback?";

/// Values collected by the lead form. Only name and email are required by the form itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFields {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

impl LeadFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn into_submission(self, conversation_context: Vec<Turn>) -> LeadSubmission {
        LeadSubmission {
            name: self.name,
            email: self.email,
            phone: self.phone.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            message: self.message.unwrap_or_default(),
            source: LEAD_SOURCE,
            conversation_context,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadOutcome {
    Submitted,
    Failed(FailureKind),
}

pub fn lead_confirmation(name: &str, email: &str) -> String {
    format!(
        "Thank you, {name}! 🎉 Our team will reach out to you within 24 hours at {email}. \
In the meantime, feel free to ask me any other questions."
    )
}

/// Alert text for a failed lead submission.
pub fn lead_failure_notice(kind: FailureKind, contacts: &ContactSettings) -> String {
    match kind {
        FailureKind::Backend => format!(
            "There was an error submitting your details. Please try again or call us directly at {}.",
            contacts.phone
        ),
        FailureKind::Transport => format!(
            "Unable to submit. Please contact us at {} or {}.",
            contacts.email, contacts.phone
        ),
    }
}

/// First three characters, then a mask.
fn redact_email(email: &str) -> String {
    let visible = email.chars().take(3).collect::<String>();
    format!("{visible}***")
}

/// Lead capture: invitation, form surface and submission.
pub struct LeadFlow {
    backend: Arc<dyn ChatBackend>,
    session: WidgetSession,
    view: Arc<dyn WidgetView>,
    contacts: ContactSettings,
}

impl LeadFlow {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        session: WidgetSession,
        view: Arc<dyn WidgetView>,
        contacts: ContactSettings,
    ) -> Self {
        Self {
            backend,
            session,
            view,
            contacts,
        }
    }

    pub async fn show_prompt(&self) {
        self.view.append_message(Sender::Bot, LEAD_INVITATION);
        self.view.offer_lead_capture();
        self.session.set_lead_offer_visible(true).await;
    }

    /// Accepts the offer. Returns false when no offer is showing.
    pub async fn open_form(&self) -> bool {
        if !self.session.lead_offer_visible().await {
            tracing::debug!("no lead offer showing, form stays closed");
            return false;
        }

        self.session.set_lead_form_open(true).await;
        self.view.set_lead_form_visible(true);
        self.view.focus_lead_form();
        true
    }

    /// Withdraws the offer. Returns false when no offer is showing.
    pub async fn decline_offer(&self) -> bool {
        if !self.session.lead_offer_visible().await {
            return false;
        }

        self.session.set_lead_offer_visible(false).await;
        self.view.withdraw_lead_offer();
        true
    }

    /// Closes the form without submitting. Entered values are kept.
    pub async fn close_form(&self) {
        self.session.set_lead_form_open(false).await;
        self.view.set_lead_form_visible(false);
    }

    pub async fn submit(&self, fields: LeadFields) -> LeadOutcome {
        let context = self.session.recent_turns(LEAD_CONTEXT_TURNS).await;
        let context_turns = context.len();
        let name = fields.name.clone();
        let submission = fields.into_submission(context);

        match self.backend.submit_lead(&submission).await {
            Ok(ack) => {
                tracing::info!(
                    email = %redact_email(&submission.email),
                    context_turns,
                    acknowledged = ?ack.success,
                    "lead submitted"
                );

                self.close_form().await;
                self.view.clear_lead_form();
                self.view.append_message(
                    Sender::Bot,
                    &lead_confirmation(&name, &submission.email),
                );
                LeadOutcome::Submitted
            }
            Err(error) => {
                let kind = error.kind();
                tracing::warn!(
                    email = %redact_email(&submission.email),
                    stage = error.stage(),
                    ?kind,
                    %error,
                    "lead submission failed"
                );

                self.view.alert(&lead_failure_notice(kind, &self.contacts));
                LeadOutcome::Failed(kind)
            }
        }
    }
}
