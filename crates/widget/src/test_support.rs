use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chatline_transport::{
    BoxFuture, ChatBackend, ChatReply, FailureKind, HealthStatus, LeadAck, LeadSubmission,
    TransportError, TransportResult,
};
use tokio::sync::Notify;

use crate::chat::Sender;
use crate::view::WidgetView;

fn failure(kind: FailureKind, endpoint: &str) -> TransportError {
    match kind {
        FailureKind::Backend => TransportError::Backend {
            stage: "scripted-status",
            endpoint: endpoint.to_string(),
            status: 500,
        },
        FailureKind::Transport => TransportError::Unreachable {
            stage: "scripted-send",
            endpoint: endpoint.to_string(),
            source: std::io::Error::other("connection refused").into(),
        },
    }
}

/// Backend that answers from queued outcomes and records what it was sent.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    chat_replies: Mutex<VecDeque<Result<ChatReply, FailureKind>>>,
    lead_replies: Mutex<VecDeque<Result<LeadAck, FailureKind>>>,
    health: Mutex<Option<FailureKind>>,
    chat_messages: Mutex<Vec<String>>,
    lead_submissions: Mutex<Vec<LeadSubmission>>,
    health_checks: Mutex<usize>,
    gate: Option<Arc<Notify>>,
    chat_called: Notify,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, outcome: Result<ChatReply, FailureKind>) -> Self {
        lock(&self.chat_replies).push_back(outcome);
        self
    }

    /// Unqueued lead submissions are acknowledged.
    pub(crate) fn lead_reply(self, outcome: Result<LeadAck, FailureKind>) -> Self {
        lock(&self.lead_replies).push_back(outcome);
        self
    }

    pub(crate) fn failing_health(self, kind: FailureKind) -> Self {
        *lock(&self.health) = Some(kind);
        self
    }

    /// Holds every chat call until [`Self::release`].
    pub(crate) fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub(crate) fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub(crate) async fn wait_for_chat_call(&self) {
        self.chat_called.notified().await;
    }

    pub(crate) fn chat_messages(&self) -> Vec<String> {
        lock(&self.chat_messages).clone()
    }

    pub(crate) fn lead_submissions(&self) -> Vec<LeadSubmission> {
        lock(&self.lead_submissions).clone()
    }

    pub(crate) fn health_checks(&self) -> usize {
        *lock(&self.health_checks)
    }
}

impl ChatBackend for ScriptedBackend {
    fn send_chat_message<'a>(
        &'a self,
        text: &'a str,
    ) -> BoxFuture<'a, TransportResult<ChatReply>> {
        Box::pin(async move {
            lock(&self.chat_messages).push(text.to_string());
            self.chat_called.notify_one();

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            let outcome = lock(&self.chat_replies)
                .pop_front()
                .unwrap_or(Err(FailureKind::Transport));
            outcome.map_err(|kind| failure(kind, "/api/chat"))
        })
    }

    fn submit_lead<'a>(
        &'a self,
        payload: &'a LeadSubmission,
    ) -> BoxFuture<'a, TransportResult<LeadAck>> {
        Box::pin(async move {
            lock(&self.lead_submissions).push(payload.clone());

            let outcome = lock(&self.lead_replies)
                .pop_front()
                .unwrap_or_else(|| Ok(LeadAck::default()));
            outcome.map_err(|kind| failure(kind, "/api/lead"))
        })
    }

    fn check_health(&self) -> BoxFuture<'_, TransportResult<HealthStatus>> {
        Box::pin(async move {
            *lock(&self.health_checks) += 1;

            match *lock(&self.health) {
                Some(kind) => Err(failure(kind, "/health")),
                None => Ok(HealthStatus {
                    status: Some("healthy".to_string()),
                    ..HealthStatus::default()
                }),
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewCall {
    Message(Sender, String),
    Typing(bool),
    WidgetOpen(bool),
    FocusInput,
    ClearInput,
    HideQuickActions,
    OfferLeadCapture,
    WithdrawLeadOffer,
    LeadFormVisible(bool),
    FocusLeadForm,
    ClearLeadForm,
    Alert(String),
}

/// View that records every call in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub(crate) fn calls(&self) -> Vec<ViewCall> {
        lock(&self.calls).clone()
    }

    pub(crate) fn messages(&self) -> Vec<(Sender, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ViewCall::Message(sender, markup) => Some((sender, markup)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ViewCall) {
        lock(&self.calls).push(call);
    }
}

impl WidgetView for RecordingView {
    fn append_message(&self, sender: Sender, markup: &str) {
        self.record(ViewCall::Message(sender, markup.to_string()));
    }

    fn set_typing(&self, visible: bool) {
        self.record(ViewCall::Typing(visible));
    }

    fn set_widget_open(&self, open: bool) {
        self.record(ViewCall::WidgetOpen(open));
    }

    fn focus_input(&self) {
        self.record(ViewCall::FocusInput);
    }

    fn clear_input(&self) {
        self.record(ViewCall::ClearInput);
    }

    fn hide_quick_actions(&self) {
        self.record(ViewCall::HideQuickActions);
    }

    fn offer_lead_capture(&self) {
        self.record(ViewCall::OfferLeadCapture);
    }

    fn withdraw_lead_offer(&self) {
        self.record(ViewCall::WithdrawLeadOffer);
    }

    fn set_lead_form_visible(&self, visible: bool) {
        self.record(ViewCall::LeadFormVisible(visible));
    }

    fn focus_lead_form(&self) {
        self.record(ViewCall::FocusLeadForm);
    }

    fn clear_lead_form(&self) {
        self.record(ViewCall::ClearLeadForm);
    }

    fn alert(&self, notice: &str) {
        self.record(ViewCall::Alert(notice.to_string()));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().expect("test mutex poisoned")
}
