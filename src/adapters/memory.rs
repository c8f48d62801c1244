use crate::domain::ports::FormField;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct FieldState {
    value: String,
    caret: Option<usize>,
    focused: bool,
}

/// In-process text control. Clones share the same underlying state, the way two
/// references to one DOM element do.
#[derive(Debug, Clone, Default)]
pub struct InMemoryField {
    state: Arc<Mutex<FieldState>>,
}

impl InMemoryField {
    pub fn new(value: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(FieldState {
                value: value.to_string(),
                caret: Some(value.chars().count()),
                focused: false,
            })),
        }
    }

    pub fn focused(value: &str) -> Self {
        let field = Self::new(value);
        field.set_focus(true);
        field
    }

    fn lock(&self) -> MutexGuard<'_, FieldState> {
        // 欄位狀態沒有跨欄位的不變式，中毒後直接沿用
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_focus(&self, focused: bool) {
        self.lock().focused = focused;
    }

    /// Inserts text at the caret and moves the caret after it, as a keystroke or paste would.
    pub fn paste(&self, text: &str) {
        let mut state = self.lock();
        let len = state.value.chars().count();
        let at = state.caret.unwrap_or(len).min(len);
        let byte_at = state
            .value
            .char_indices()
            .nth(at)
            .map(|(i, _)| i)
            .unwrap_or(state.value.len());
        state.value.insert_str(byte_at, text);
        state.caret = Some(at + text.chars().count());
    }

    pub fn type_char(&self, ch: char) {
        let mut buf = [0u8; 4];
        self.paste(ch.encode_utf8(&mut buf));
    }
}

impl FormField for InMemoryField {
    fn value(&self) -> String {
        self.lock().value.clone()
    }

    fn set_value(&self, value: &str) {
        let mut state = self.lock();
        state.value = value.to_string();
        let len = state.value.chars().count();
        state.caret = state.caret.map(|c| c.min(len));
    }

    fn selection_start(&self) -> Option<usize> {
        self.lock().caret
    }

    fn set_selection_range(&self, start: usize, _end: usize) {
        let mut state = self.lock();
        let len = state.value.chars().count();
        state.caret = Some(start.min(len));
    }

    fn has_focus(&self) -> bool {
        self.lock().focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let field = InMemoryField::new("abc");
        let handle = field.clone();

        handle.set_value("xyz");
        assert_eq!(field.value(), "xyz");
    }

    #[test]
    fn test_paste_at_caret() {
        let field = InMemoryField::focused("0100");
        field.set_selection_range(2, 2);
        field.paste("99");

        assert_eq!(field.value(), "019900");
        assert_eq!(field.selection_start(), Some(4));
    }

    #[test]
    fn test_set_value_clamps_caret() {
        let field = InMemoryField::new("12345-678");
        field.set_value("123");
        assert_eq!(field.selection_start(), Some(3));
    }
}
