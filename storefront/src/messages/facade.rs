use super::{Message, MessageAction, selectors};
use crate::app::AppStore;
use futures::Stream;
use storefront_core::selector::Selection;

/// Message views and commands
#[derive(Clone)]
pub struct MessageFacade {
    store: AppStore,
}

impl MessageFacade {
    /// Facade over `store`
    #[must_use]
    pub const fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// Shown messages, oldest first
    #[must_use]
    pub fn messages(&self) -> Selection<Vec<Message>> {
        self.store.select(selectors::messages)
    }

    /// Messages raised after this call, one at a time.
    ///
    /// A message dismissed before the stream is polled is skipped. Ends when
    /// the store is dropped.
    pub fn new_messages(&self) -> impl Stream<Item = Message> + Send + use<> {
        let mut selection = self.store.select(selectors::message_state);
        let mut next = self.store.state(|state| state.messages.next_seq);
        async_stream::stream! {
            while let Some(state) = selection.next().await {
                for message in state.messages.into_iter() {
                    if message.seq < next {
                        continue;
                    }
                    next = message.seq + 1;
                    yield message;
                }
            }
        }
    }

    /// Show a confirmation
    pub fn success(&self, message: impl Into<String>) {
        self.store.dispatch(
            MessageAction::DisplaySuccessMessage {
                message: message.into(),
            }
            .into(),
        );
    }

    /// Show a failure
    pub fn error(&self, message: impl Into<String>) {
        self.store.dispatch(
            MessageAction::DisplayErrorMessage {
                message: message.into(),
            }
            .into(),
        );
    }

    /// Remove all shown messages
    pub fn dismiss(&self) {
        self.store.dispatch(MessageAction::DismissMessages.into());
    }
}
