//! Demo terminal responder: one of a handful of canned replies.

use std::sync::Arc;

use parley_intent::{Picker, ThreadRngPicker};

use crate::provider::{ProviderId, TerminalResponder, Turn};

pub const DEMO_REPLIES: [&str; 5] = [
    "I'm here to help you with your questions!",
    "That's an interesting question. Let me think about it.",
    "Based on what you're asking, I suggest...",
    "Thank you for your message. How can I assist you further?",
    "I understand your concern. Let me provide some information.",
];

/// Picks a reply uniformly, ignoring the input.
pub struct DemoResponder {
    picker: Arc<dyn Picker>,
}

impl DemoResponder {
    pub fn new(picker: Arc<dyn Picker>) -> Self {
        Self { picker }
    }
}

impl Default for DemoResponder {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRngPicker))
    }
}

impl TerminalResponder for DemoResponder {
    fn id(&self) -> ProviderId {
        ProviderId::Demo
    }

    fn respond(&self, _turn: &Turn<'_>) -> String {
        DEMO_REPLIES[self.picker.pick(DEMO_REPLIES.len())].to_owned()
    }
}
