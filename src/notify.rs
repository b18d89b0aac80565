//! Diagnostic notification channel
//!
//! Observers register per [`Channel`] and receive every message synchronously,
//! in emission order. Registrations last until [`Notifier::unsubscribe`] or
//! until the notifier is dropped. Every message is also forwarded to the
//! `log` facade under the `ydecode` target.

use std::fmt;

use log::Level;

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Progress,
    Message,
    Warning,
    Error,
    Debug,
}

impl Channel {
    fn level(self) -> Level {
        match self {
            Channel::Progress | Channel::Message => Level::Info,
            Channel::Warning => Level::Warn,
            Channel::Error => Level::Error,
            Channel::Debug => Level::Debug,
        }
    }
}

/// Handle returned by [`Notifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&str)>;

/// Registry of observers, one list per channel
#[derive(Default)]
pub struct Notifier {
    next_id: u64,
    observers: Vec<(SubscriptionId, Channel, Observer)>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, channel: Channel, observer: F) -> SubscriptionId
    where
        F: FnMut(&str) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, channel, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn emit(&mut self, channel: Channel, message: &str) {
        log::log!(target: "ydecode", channel.level(), "{}", message);
        for (_, ch, observer) in self.observers.iter_mut() {
            if *ch == channel {
                observer(message);
            }
        }
    }

    pub fn progress(&mut self, message: &str) {
        self.emit(Channel::Progress, message);
    }

    pub fn message(&mut self, message: &str) {
        self.emit(Channel::Message, message);
    }

    pub fn warning(&mut self, message: &str) {
        self.emit(Channel::Warning, message);
    }

    pub fn error(&mut self, message: &str) {
        self.emit(Channel::Error, message);
    }

    pub fn debug(&mut self, message: &str) {
        self.emit(Channel::Debug, message);
    }
}
