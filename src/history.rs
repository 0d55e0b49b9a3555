//! Undo/redo stacks for a `GameSession`.

use tracing::debug;

use crate::game::GameSession;
use crate::moves::MoveRecord;

/// Two LIFO stacks of applied and undone moves.
///
/// Recording a new move clears the redo stack; there is no branching history.
#[derive(Clone, Debug, Default)]
pub struct History {
    done: Vec<MoveRecord>,
    undone: Vec<MoveRecord>,
}

impl History {
    /// Push a freshly applied move. Anything that could have been redone is
    /// discarded.
    pub fn record(&mut self, record: MoveRecord) {
        self.undone.clear();
        self.done.push(record);
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn done(&self) -> &[MoveRecord] {
        &self.done
    }
}

impl GameSession {
    /// Reverse the most recent move and restore the score it started from.
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(record) = self.history.done.pop() else {
            return false;
        };
        record.kind.undo(&mut self.board);
        self.score = record.old_score;
        self.move_count = self.move_count.saturating_sub(1);
        debug!(what = %record.kind.describe(), score = self.score, "undo");
        self.history.undone.push(record);
        self.refresh_status();
        true
    }

    /// Re-apply the most recently undone move, re-scoring it from the
    /// current score.
    pub fn redo(&mut self) -> bool {
        let Some(mut record) = self.history.undone.pop() else {
            return false;
        };
        record.kind.redo(&mut self.board);
        record.old_score = self.score;
        self.score = record.kind.score_after(self.score);
        self.move_count += 1;
        debug!(what = %record.kind.describe(), score = self.score, "redo");
        self.history.done.push(record);
        self.refresh_status();
        true
    }
}
