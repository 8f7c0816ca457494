//! Search box behaviour
//!
//! Typing is debounced before the query reaches the post index. Escape
//! clears the box immediately, and `/` jumps to it from anywhere that is
//! not already a text field.

mod debounce;

use std::sync::Arc;
use std::time::Duration;

pub use debounce::Debouncer;

use crate::config::SearchConfig;
use crate::index::FilterSink;

/// Keys the search box reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Slash,
    Other,
}

/// Element a key event was dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    SearchBox,
    TextInput,
    TextArea,
    Other,
}

impl KeyTarget {
    fn is_text_field(self) -> bool {
        matches!(
            self,
            KeyTarget::SearchBox | KeyTarget::TextInput | KeyTarget::TextArea
        )
    }
}

/// State of the search box
pub struct SearchController {
    sink: Arc<dyn FilterSink>,
    debouncer: Debouncer,
    value: String,
    focused: bool,
}

impl SearchController {
    pub fn new(sink: Arc<dyn FilterSink>, delay: Duration) -> Self {
        Self {
            sink,
            debouncer: Debouncer::new(delay),
            value: String::new(),
            focused: false,
        }
    }

    pub fn from_config(sink: Arc<dyn FilterSink>, config: &SearchConfig) -> Self {
        Self::new(sink, Duration::from_millis(config.debounce_ms))
    }

    /// The box's value changed; filter once typing pauses
    pub fn on_input(&mut self, value: &str) {
        self.value = value.to_string();
        let query = value.trim().to_string();
        let sink = self.sink.clone();
        self.debouncer.schedule(async move {
            tracing::debug!("Applying search query {:?}", query);
            sink.filter(&query);
        });
    }

    /// Handle a key press. Returns true when the key's default action
    /// should be suppressed.
    pub fn on_key(&mut self, key: Key, target: KeyTarget) -> bool {
        match key {
            Key::Escape if target == KeyTarget::SearchBox => {
                self.clear();
                self.focused = false;
                false
            }
            Key::Slash if !target.is_text_field() => {
                self.focused = true;
                true
            }
            _ => false,
        }
    }

    /// Empty the box and show everything again, without waiting
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.value.clear();
        self.sink.filter("");
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}
