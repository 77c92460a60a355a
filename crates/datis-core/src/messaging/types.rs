use crate::callback::CallbackAction;

/// Outgoing "chat action" (typing indicator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
}

/// Inline keyboard, row by row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, action: &CallbackAction) -> Self {
        Self {
            label: label.into(),
            callback_data: action.encode(),
        }
    }
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    /// Lay buttons out `columns` per row, last row possibly shorter.
    pub fn grid(buttons: Vec<InlineButton>, columns: usize) -> Self {
        let columns = columns.max(1);
        let rows = buttons
            .chunks(columns)
            .map(|row| row.to_vec())
            .collect();
        Self { rows }
    }

    pub fn push_row(&mut self, row: Vec<InlineButton>) {
        if !row.is_empty() {
            self.rows.push(row);
        }
    }
}
