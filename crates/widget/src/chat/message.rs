use chatline_transport::FailureKind;

/// Identifier for one chat exchange (one submit and its reply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(pub u64);

impl ExchangeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Who a transcript entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// User text accepted for an exchange whose reply has not arrived yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub exchange_id: ExchangeId,
    pub user: String,
}

/// Lifecycle of the single chat exchange the widget allows at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExchangeState {
    #[default]
    Idle,
    Sending(ExchangeId),
    Succeeded(ExchangeId),
    Failed {
        exchange_id: ExchangeId,
        kind: FailureKind,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeTransition {
    Start(ExchangeId),
    Succeed(ExchangeId),
    Fail {
        exchange_id: ExchangeId,
        kind: FailureKind,
    },
    ResetToIdle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeTransitionRejection {
    AlreadySending {
        active: ExchangeId,
        attempted: ExchangeId,
    },
    NotSending,
    ExchangeMismatch {
        active: ExchangeId,
        attempted: ExchangeId,
    },
}

pub type ExchangeTransitionResult = Result<ExchangeState, ExchangeTransitionRejection>;

impl ExchangeState {
    pub fn is_sending(&self) -> bool {
        matches!(self, Self::Sending(_))
    }

    /// Returns the in-flight exchange if and only if state is `Sending`.
    pub fn active_exchange(&self) -> Option<ExchangeId> {
        match self {
            Self::Sending(exchange_id) => Some(*exchange_id),
            Self::Idle | Self::Succeeded(_) | Self::Failed { .. } => None,
        }
    }

    /// Applies one transition.
    ///
    /// Only a non-sending state may start an exchange, and terminal transitions must name the
    /// exchange currently in flight.
    pub fn apply(&self, transition: ExchangeTransition) -> ExchangeTransitionResult {
        match transition {
            ExchangeTransition::Start(exchange_id) => self.apply_start(exchange_id),
            ExchangeTransition::Succeed(exchange_id) => {
                self.apply_terminal(exchange_id, Self::Succeeded(exchange_id))
            }
            ExchangeTransition::Fail { exchange_id, kind } => {
                self.apply_terminal(exchange_id, Self::Failed { exchange_id, kind })
            }
            ExchangeTransition::ResetToIdle => Ok(Self::Idle),
        }
    }

    fn apply_start(&self, exchange_id: ExchangeId) -> ExchangeTransitionResult {
        match self {
            Self::Sending(active) => Err(ExchangeTransitionRejection::AlreadySending {
                active: *active,
                attempted: exchange_id,
            }),
            Self::Idle | Self::Succeeded(_) | Self::Failed { .. } => {
                Ok(Self::Sending(exchange_id))
            }
        }
    }

    fn apply_terminal(
        &self,
        exchange_id: ExchangeId,
        next: ExchangeState,
    ) -> ExchangeTransitionResult {
        match self {
            Self::Sending(active) if *active == exchange_id => Ok(next),
            Self::Sending(active) => Err(ExchangeTransitionRejection::ExchangeMismatch {
                active: *active,
                attempted: exchange_id,
            }),
            Self::Idle | Self::Succeeded(_) | Self::Failed { .. } => {
                Err(ExchangeTransitionRejection::NotSending)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_runs_idle_sending_terminal_idle() {
        let first = ExchangeId::new(1);
        let state = ExchangeState::Idle;

        let state = state
            .apply(ExchangeTransition::Start(first))
            .expect("idle accepts start");
        assert_eq!(state.active_exchange(), Some(first));

        let state = state
            .apply(ExchangeTransition::Succeed(first))
            .expect("sending accepts matching success");
        assert_eq!(state, ExchangeState::Succeeded(first));

        let state = state
            .apply(ExchangeTransition::ResetToIdle)
            .expect("reset always applies");
        assert_eq!(state, ExchangeState::Idle);
    }

    #[test]
    fn second_start_while_sending_is_rejected() {
        let state = ExchangeState::Sending(ExchangeId::new(1));

        let rejection = state
            .apply(ExchangeTransition::Start(ExchangeId::new(2)))
            .expect_err("only one exchange may be in flight");

        assert_eq!(
            rejection,
            ExchangeTransitionRejection::AlreadySending {
                active: ExchangeId::new(1),
                attempted: ExchangeId::new(2),
            }
        );
    }

    #[test]
    fn terminal_transition_must_match_active_exchange() {
        let state = ExchangeState::Sending(ExchangeId::new(3));

        assert!(matches!(
            state.apply(ExchangeTransition::Fail {
                exchange_id: ExchangeId::new(4),
                kind: FailureKind::Backend,
            }),
            Err(ExchangeTransitionRejection::ExchangeMismatch { .. })
        ));
        assert_eq!(
            ExchangeState::Idle.apply(ExchangeTransition::Succeed(ExchangeId::new(3))),
            Err(ExchangeTransitionRejection::NotSending)
        );
    }

    #[test]
    fn failed_exchange_records_kind() {
        let state = ExchangeState::Sending(ExchangeId::new(5))
            .apply(ExchangeTransition::Fail {
                exchange_id: ExchangeId::new(5),
                kind: FailureKind::Transport,
            })
            .expect("matching failure applies");

        assert_eq!(
            state,
            ExchangeState::Failed {
                exchange_id: ExchangeId::new(5),
                kind: FailureKind::Transport,
            }
        );
        assert!(!state.is_sending());
    }
}
