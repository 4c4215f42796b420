use std::sync::Arc;

use chatline_transport::ChatBackend;
use tokio::task::JoinHandle;

use crate::chat::{ChatFlow, SubmitOutcome};
use crate::events::{Intent, Payload, UiEvent};
use crate::lead::{LeadFlow, LeadOutcome};
use crate::session::WidgetSession;
use crate::settings::WidgetSettings;
use crate::view::WidgetView;

/// Result of routing one UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    Toggled { open: bool },
    Chat(SubmitOutcome),
    Lead(LeadOutcome),
    /// A surface-only intent ran (offer or form visibility).
    Surface,
    /// No binding, the event lacked the payload its intent needs, or no lead offer was showing.
    Ignored,
}

/// One widget instance: session, controllers and the view they drive.
#[derive(Clone)]
pub struct WidgetApp {
    backend: Arc<dyn ChatBackend>,
    session: WidgetSession,
    view: Arc<dyn WidgetView>,
    chat: Arc<ChatFlow>,
    lead: Arc<LeadFlow>,
    quick_actions: Arc<[String]>,
}

impl WidgetApp {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        view: Arc<dyn WidgetView>,
        settings: &WidgetSettings,
    ) -> Self {
        let session = WidgetSession::new();
        let lead = Arc::new(LeadFlow::new(
            Arc::clone(&backend),
            session.clone(),
            Arc::clone(&view),
            settings.contacts.clone(),
        ));
        let chat = Arc::new(ChatFlow::new(
            Arc::clone(&backend),
            session.clone(),
            Arc::clone(&view),
            Arc::clone(&lead),
            settings.contacts.clone(),
            settings.lead_prompt_delay(),
        ));

        Self {
            backend,
            session,
            view,
            chat,
            lead,
            quick_actions: settings.quick_actions.clone().into(),
        }
    }

    pub fn session(&self) -> &WidgetSession {
        &self.session
    }

    pub fn quick_actions(&self) -> &[String] {
        &self.quick_actions
    }

    /// Fires the health check in the background. Startup never waits on it.
    pub fn start(&self) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);

        tokio::spawn(async move {
            match backend.check_health().await {
                Ok(health) => tracing::info!(
                    status = health.status.as_deref().unwrap_or("unknown"),
                    version = health.version.as_deref().unwrap_or("unknown"),
                    environment = health.environment.as_deref().unwrap_or("unknown"),
                    "backend health check passed"
                ),
                Err(error) => tracing::warn!(
                    stage = error.stage(),
                    %error,
                    "backend health check failed"
                ),
            }
        })
    }

    /// Opens or closes the widget; opening focuses the input.
    pub async fn toggle(&self) -> bool {
        let open = self.session.toggle_open().await;
        self.view.set_widget_open(open);
        if open {
            self.view.focus_input();
        }
        open
    }

    pub async fn handle_event(&self, event: UiEvent) -> Handled {
        let Some(intent) = event.intent() else {
            tracing::debug!(control = ?event.control, gesture = ?event.gesture, "unbound gesture");
            return Handled::Ignored;
        };

        self.dispatch(intent, event.payload).await
    }

    pub async fn dispatch(&self, intent: Intent, payload: Payload) -> Handled {
        match (intent, payload) {
            (Intent::ToggleWidget, _) => Handled::Toggled {
                open: self.toggle().await,
            },
            (Intent::SendInput | Intent::SendQuickAction, Payload::Text(text)) => {
                Handled::Chat(self.chat.submit(&text).await)
            }
            (Intent::OpenLeadForm, _) => surface(self.lead.open_form().await),
            (Intent::DeclineLeadOffer, _) => surface(self.lead.decline_offer().await),
            (Intent::CloseLeadForm, _) => {
                self.lead.close_form().await;
                Handled::Surface
            }
            (Intent::SubmitLead, Payload::Lead(fields)) => {
                Handled::Lead(self.lead.submit(fields).await)
            }
            (intent, payload) => {
                tracing::debug!(?intent, ?payload, "event payload does not fit intent");
                Handled::Ignored
            }
        }
    }
}

fn surface(applied: bool) -> Handled {
    if applied {
        Handled::Surface
    } else {
        Handled::Ignored
    }
}
