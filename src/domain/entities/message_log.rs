use serde::Serialize;

use crate::domain::entities::Turn;

/// Append-only conversation record. Turns are never removed or edited.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageLog {
    turns: Vec<Turn>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns appended after the first `offset` ones.
    pub fn since(&self, offset: usize) -> &[Turn] {
        self.turns.get(offset..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
