use chatline_transport::Turn;

/// Append-only log of completed turns for one widget session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationBuffer {
    turns: Vec<Turn>,
}

impl ConversationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Copies the newest `count` turns, oldest first.
    pub fn recent(&self, count: usize) -> Vec<Turn> {
        let start = self.turns.len().saturating_sub(count);
        self.turns[start..].to_vec()
    }
}
