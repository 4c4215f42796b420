mod buffer;
mod flow;
mod format;
mod message;

pub use buffer::ConversationBuffer;
pub use flow::{ChatFlow, IgnoreReason, SubmitOutcome, chat_fallback};
pub use format::{BULLET_GLYPH, LINE_BREAK, format_message};
pub use message::{
    ExchangeId, ExchangeState, ExchangeTransition, ExchangeTransitionRejection,
    ExchangeTransitionResult, PendingTurn, Sender,
};
