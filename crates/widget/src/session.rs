use std::sync::Arc;

use chatline_transport::{FailureKind, Turn};
use tokio::sync::Mutex;

use crate::chat::{
    ConversationBuffer, ExchangeId, ExchangeState, ExchangeTransition, PendingTurn,
};

/// Everything one widget session owns. Dropped with the session; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub buffer: ConversationBuffer,
    pub exchange: ExchangeState,
    pub pending: Option<PendingTurn>,
    pub widget_open: bool,
    pub quick_actions_visible: bool,
    pub lead_offer_visible: bool,
    pub lead_form_open: bool,
    next_exchange_id: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            buffer: ConversationBuffer::new(),
            exchange: ExchangeState::Idle,
            pending: None,
            widget_open: false,
            quick_actions_visible: true,
            lead_offer_visible: false,
            lead_form_open: false,
            next_exchange_id: 1,
        }
    }
}

impl SessionState {
    fn alloc_exchange_id(&mut self) -> ExchangeId {
        let id = ExchangeId::new(self.next_exchange_id);
        self.next_exchange_id = self.next_exchange_id.saturating_add(1);
        id
    }

    fn finish(&mut self, transition: ExchangeTransition) {
        match self.exchange.apply(transition) {
            Ok(terminal) => {
                tracing::debug!(state = ?terminal, "exchange finished");
                // Terminal states are transient; the next message must be accepted.
                self.exchange = terminal
                    .apply(ExchangeTransition::ResetToIdle)
                    .unwrap_or_default();
                self.pending = None;
            }
            Err(rejection) => {
                tracing::warn!(?rejection, "exchange transition rejected");
            }
        }
    }
}

/// Session-scoped context shared by the chat and lead controllers.
///
/// The lock is only held for bookkeeping, never across a network call.
#[derive(Debug, Clone, Default)]
pub struct WidgetSession {
    state: Arc<Mutex<SessionState>>,
}

impl WidgetSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an exchange for `user` unless one is already in flight.
    pub async fn begin_exchange(&self, user: &str) -> Option<ExchangeId> {
        let mut state = self.state.lock().await;
        let exchange_id = state.alloc_exchange_id();

        let next = state
            .exchange
            .apply(ExchangeTransition::Start(exchange_id))
            .ok()?;
        state.exchange = next;
        state.pending = Some(PendingTurn {
            exchange_id,
            user: user.to_string(),
        });
        Some(exchange_id)
    }

    /// Records `turn` for `exchange_id` and returns to idle.
    ///
    /// Returns false when `exchange_id` is not the exchange in flight; nothing is recorded then.
    pub async fn complete_exchange(&self, exchange_id: ExchangeId, turn: Turn) -> bool {
        let mut state = self.state.lock().await;

        let matches_pending = state
            .pending
            .as_ref()
            .is_some_and(|pending| pending.exchange_id == exchange_id);
        if matches_pending {
            state.buffer.push(turn);
        }

        state.finish(ExchangeTransition::Succeed(exchange_id));
        matches_pending
    }

    /// Drops the forming turn for `exchange_id` and returns to idle.
    pub async fn fail_exchange(&self, exchange_id: ExchangeId, kind: FailureKind) {
        let mut state = self.state.lock().await;
        state.finish(ExchangeTransition::Fail { exchange_id, kind });
    }

    pub async fn is_sending(&self) -> bool {
        self.state.lock().await.exchange.is_sending()
    }

    /// Newest `count` turns at call time, oldest first.
    pub async fn recent_turns(&self, count: usize) -> Vec<Turn> {
        self.state.lock().await.buffer.recent(count)
    }

    pub async fn turn_count(&self) -> usize {
        self.state.lock().await.buffer.len()
    }

    /// Flips the widget open flag and returns the new value.
    pub async fn toggle_open(&self) -> bool {
        let mut state = self.state.lock().await;
        state.widget_open = !state.widget_open;
        state.widget_open
    }

    /// Hides the quick-action strip; returns true only on the first call.
    pub async fn hide_quick_actions(&self) -> bool {
        let mut state = self.state.lock().await;
        std::mem::replace(&mut state.quick_actions_visible, false)
    }

    pub async fn set_lead_offer_visible(&self, visible: bool) {
        self.state.lock().await.lead_offer_visible = visible;
    }

    pub async fn lead_offer_visible(&self) -> bool {
        self.state.lock().await.lead_offer_visible
    }

    pub async fn set_lead_form_open(&self, open: bool) {
        self.state.lock().await.lead_form_open = open;
    }

    pub async fn lead_form_open(&self) -> bool {
        self.state.lock().await.lead_form_open
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }
}
