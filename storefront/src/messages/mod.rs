//! Toast messages shown to the user.
//!
//! Messages are plain state. Other features raise them through effects that
//! map their outcomes to [`MessageAction`]s; nothing here talks to the API.

mod facade;

pub use facade::MessageFacade;

use crate::app::AppAction;
use storefront_core::prelude::*;
use storefront_macros::Action;

/// Message actions
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum MessageAction {
    /// Show a confirmation
    #[event("[Message] Success Toast")]
    DisplaySuccessMessage {
        /// Text to show
        message: String,
    },

    /// Show a failure
    #[event("[Message] Error Toast")]
    DisplayErrorMessage {
        /// Text to show
        message: String,
    },

    /// Remove all shown messages
    #[event("[Message] Dismiss Messages")]
    DismissMessages,
}

/// Severity of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Confirmation
    Success,
    /// Failure
    Error,
}

/// A shown message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Position in the order messages were raised; never reused
    pub seq: u64,
    /// Severity
    pub kind: MessageKind,
    /// Text
    pub text: String,
}

/// Message slice, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageState {
    /// Shown messages
    pub messages: Vec<Message>,
    /// Sequence number of the next raised message; survives dismissal
    pub next_seq: u64,
}

impl MessageState {
    fn raise(&mut self, kind: MessageKind, text: &str) {
        self.messages.push(Message {
            seq: self.next_seq,
            kind,
            text: text.to_string(),
        });
        self.next_seq += 1;
    }
}

/// Reducer for [`MessageState`]
pub struct MessageReducer;

impl Reducer for MessageReducer {
    type State = MessageState;
    type Action = AppAction;

    fn reduce(&self, state: &mut MessageState, action: &AppAction) {
        let AppAction::Message(action) = action else {
            return;
        };
        match action {
            MessageAction::DisplaySuccessMessage { message } => state.raise(MessageKind::Success, message),
            MessageAction::DisplayErrorMessage { message } => state.raise(MessageKind::Error, message),
            MessageAction::DismissMessages => state.messages.clear(),
        }
    }
}

/// Selectors over the message slice
pub mod selectors {
    use super::{Message, MessageState};
    use crate::app::AppState;

    /// Shown messages, oldest first
    #[must_use]
    pub fn messages(state: &AppState) -> Vec<Message> {
        state.messages.messages.clone()
    }

    /// The whole slice, sequence counter included
    #[must_use]
    pub fn message_state(state: &AppState) -> MessageState {
        state.messages.clone()
    }

    /// Number of shown messages
    #[must_use]
    pub fn message_count(state: &AppState) -> usize {
        state.messages.messages.len()
    }
}
