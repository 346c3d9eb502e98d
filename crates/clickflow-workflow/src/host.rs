//! Host collaborators the engine calls out to.
//!
//! The engine never touches a terminal, window or random source directly;
//! everything ambient is injected through these traits so runs can be driven
//! headless.

use std::collections::VecDeque;

use parking_lot::Mutex;
use rand::Rng;

/// Primitives of the context hosting the trigger.
pub trait Host: Send + Sync {
    /// Show a blocking notice to the user.
    fn notify_user(&self, message: &str);

    /// Ask the user for a line of text. `None` means the user cancelled.
    fn prompt_user(&self, message: &str) -> Option<String>;

    /// Reload the hosting context. Ends the current run.
    fn reload_host(&self);

    /// Close the hosting context. Ends the current run.
    fn close_host(&self);
}

/// Source of colors for recolor actions without an explicit color.
pub trait ColorSource: Send + Sync {
    /// A color formatted as `#RRGGBB`.
    fn next_color(&self) -> String;
}

/// Uniformly random 24-bit colors from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomColors;

impl ColorSource for RandomColors {
    fn next_color(&self) -> String {
        let value: u32 = rand::rng().random_range(0..=0xFF_FFFF);
        format!("#{value:06x}")
    }
}

/// What a [`ScriptedHost`] was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Notified(String),
    Prompted(String),
    Reloaded,
    Closed,
}

/// Non-interactive host: answers prompts from a queue and records every call.
///
/// Prompts are cancelled once the queue is empty.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    answers: Mutex<VecDeque<String>>,
    events: Mutex<Vec<HostEvent>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that answers prompts with `answers`, in order.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Everything the host was asked to do so far.
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().clone()
    }

    /// Messages passed to `notify_user`.
    pub fn notices(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                HostEvent::Notified(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Host for ScriptedHost {
    fn notify_user(&self, message: &str) {
        self.events.lock().push(HostEvent::Notified(message.to_string()));
    }

    fn prompt_user(&self, message: &str) -> Option<String> {
        self.events.lock().push(HostEvent::Prompted(message.to_string()));
        self.answers.lock().pop_front()
    }

    fn reload_host(&self) {
        self.events.lock().push(HostEvent::Reloaded);
    }

    fn close_host(&self) {
        self.events.lock().push(HostEvent::Closed);
    }
}
