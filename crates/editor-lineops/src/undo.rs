//! Linear undo/redo history with compound groups.
//!
//! Every buffer replace is recorded as one [`TextEdit`]. Edits recorded while a compound change
//! is open share a group id and are undone/redone together.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextEdit {
    pub offset: usize,
    pub deleted_text: String,
    pub inserted_text: String,
}

impl TextEdit {
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct UndoStep {
    pub group_id: usize,
    pub edit: TextEdit,
}

#[derive(Debug)]
pub(crate) struct UndoRedoManager {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    max_undo: usize,
    next_group_id: usize,
    /// Nesting depth of `begin_compound` calls.
    compound_depth: usize,
    /// Group shared by all edits of the open compound change; allocated on its first edit.
    open_group_id: Option<usize>,
}

impl UndoRedoManager {
    pub fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
            next_group_id: 0,
            compound_depth: 0,
            open_group_id: None,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo groups, not steps.
    pub fn undo_depth(&self) -> usize {
        let mut depth = 0;
        let mut last = None;
        for step in &self.undo_stack {
            if last != Some(step.group_id) {
                depth += 1;
                last = Some(step.group_id);
            }
        }
        depth
    }

    pub fn in_compound(&self) -> bool {
        self.compound_depth > 0
    }

    pub fn begin_compound(&mut self) {
        self.compound_depth += 1;
    }

    pub fn end_compound(&mut self) {
        self.compound_depth = self.compound_depth.saturating_sub(1);
        if self.compound_depth == 0 {
            self.open_group_id = None;
        }
    }

    fn allocate_group(&mut self) -> usize {
        let id = self.next_group_id;
        self.next_group_id = self.next_group_id.wrapping_add(1);
        id
    }

    pub fn push(&mut self, edit: TextEdit) -> usize {
        self.redo_stack.clear();

        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
        }

        let group_id = if self.compound_depth > 0 {
            match self.open_group_id {
                Some(id) => id,
                None => {
                    let id = self.allocate_group();
                    self.open_group_id = Some(id);
                    id
                }
            }
        } else {
            self.allocate_group()
        };

        self.undo_stack.push(UndoStep { group_id, edit });
        group_id
    }

    /// Pop the newest group, newest step first.
    pub fn pop_undo_group(&mut self) -> Option<Vec<UndoStep>> {
        let last_group_id = self.undo_stack.last().map(|s| s.group_id)?;
        let mut steps = Vec::new();
        while self
            .undo_stack
            .last()
            .is_some_and(|step| step.group_id == last_group_id)
        {
            steps.extend(self.undo_stack.pop());
        }
        Some(steps)
    }

    /// Pop the most recently undone group, oldest step first.
    pub fn pop_redo_group(&mut self) -> Option<Vec<UndoStep>> {
        let last_group_id = self.redo_stack.last().map(|s| s.group_id)?;
        let mut steps = Vec::new();
        while self
            .redo_stack
            .last()
            .is_some_and(|step| step.group_id == last_group_id)
        {
            steps.extend(self.redo_stack.pop());
        }
        Some(steps)
    }

    pub fn push_redo(&mut self, step: UndoStep) {
        self.redo_stack.push(step);
    }

    pub fn push_undo_raw(&mut self, step: UndoStep) {
        self.undo_stack.push(step);
    }
}
