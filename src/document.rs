use crate::mark::{Mark, MarkId};

/// The committed marks in paint order, plus the marks undo has set aside.
///
/// A mark lives in at most one of the two stacks. The redo stack is only
/// filled by [`Document::undo`] and is thrown away by any new commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    committed: Vec<Mark>,
    redo_stack: Vec<Mark>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a freshly drawn mark and invalidates the redo stack.
    pub fn commit_new(&mut self, mark: Mark) -> MarkId {
        let id = mark.id();
        log::debug!("Committing {} {}", mark.kind(), id);
        self.committed.push(mark);
        if !self.redo_stack.is_empty() {
            log::debug!("Dropping {} redoable marks", self.redo_stack.len());
            self.redo_stack.clear();
        }
        id
    }

    /// Moves the newest mark onto the redo stack. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(mark) = self.committed.pop() else {
            return false;
        };
        log::info!("Undo {} {}", mark.kind(), mark.id());
        self.redo_stack.push(mark);
        true
    }

    /// Moves the most recently undone mark back. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(mark) = self.redo_stack.pop() else {
            return false;
        };
        log::info!("Redo {} {}", mark.kind(), mark.id());
        self.committed.push(mark);
        true
    }

    /// Drops every mark, committed or undone.
    pub fn clear(&mut self) {
        log::info!(
            "Clearing document ({} committed, {} redoable)",
            self.committed.len(),
            self.redo_stack.len()
        );
        self.committed.clear();
        self.redo_stack.clear();
    }

    /// Committed marks in paint order.
    pub fn snapshot(&self) -> &[Mark] {
        &self.committed
    }

    /// Undone marks, oldest undo first; the last one is what `redo` restores.
    pub fn redo_stack(&self) -> &[Mark] {
        &self.redo_stack
    }

    /// The committed mark with `id`, searched from the newest end since that
    /// is where the in-flight mark sits.
    pub fn mark_mut(&mut self, id: MarkId) -> Option<&mut Mark> {
        self.committed.iter_mut().rev().find(|mark| mark.id() == id)
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::{Drawable, Stroke};
    use egui::{Color32, pos2};

    fn stroke_at(x: f32) -> Mark {
        Stroke::new(pos2(x, x), 2.0, Color32::BLACK).into()
    }

    #[test]
    fn test_undo_redo_on_empty_are_noops() {
        let mut doc = Document::new();
        assert!(!doc.undo());
        assert!(!doc.redo());
        assert!(doc.is_empty());
        assert!(doc.redo_stack().is_empty());
    }

    #[test]
    fn test_mark_mut_finds_in_flight_mark() {
        let mut doc = Document::new();
        doc.commit_new(stroke_at(0.0));
        let id = doc.commit_new(stroke_at(1.0));

        doc.mark_mut(id).unwrap().reposition_or_extend(pos2(4.0, 4.0));
        assert_eq!(doc.snapshot()[1].as_stroke().unwrap().points().len(), 2);

        doc.undo();
        assert!(doc.mark_mut(id).is_none());
    }

    #[test]
    fn test_commit_clears_redo_even_without_undo() {
        let mut doc = Document::new();
        doc.commit_new(stroke_at(0.0));
        doc.commit_new(stroke_at(1.0));
        assert!(doc.undo());
        assert!(doc.can_redo());
        doc.commit_new(stroke_at(2.0));
        assert!(!doc.can_redo());
        assert_eq!(doc.len(), 2);
    }
}
