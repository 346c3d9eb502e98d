//! Terminal host: alerts and prompts on the controlling terminal.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use clickflow_workflow::{Host, TerminalAction};
use console::Style;
use parking_lot::Mutex;
use tokio::runtime::RuntimeFlavor;

/// Runs host primitives against stdin/stderr.
///
/// Alerts and prompts go to stderr so stdout stays clean for `--json`.
/// Prompts are answered from the scripted queue first, then from stdin; end
/// of input counts as a cancelled prompt.
pub struct TerminalHost {
    answers: Mutex<VecDeque<String>>,
    wait_for_enter: bool,
    requested: Mutex<Option<TerminalAction>>,
}

impl TerminalHost {
    pub fn new(answers: Vec<String>, wait_for_enter: bool) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            wait_for_enter,
            requested: Mutex::new(None),
        }
    }

    /// Reload or close request made during the run, if any.
    pub fn requested(&self) -> Option<TerminalAction> {
        *self.requested.lock()
    }

    fn read_line() -> Option<String> {
        blocking(Self::read_stdin_line)
    }

    fn read_stdin_line() -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.strip_suffix('\n').unwrap_or(&line);
                let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
                Some(trimmed.to_string())
            }
            Err(e) => {
                tracing::warn!("Failed to read from stdin: {}", e);
                None
            }
        }
    }
}

/// Run a blocking read off the async scheduler when inside a multi-thread
/// runtime, so the Ctrl-C listener keeps running while the user is waited on.
fn blocking<T>(f: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

impl Host for TerminalHost {
    fn notify_user(&self, message: &str) {
        let yellow = Style::new().yellow().bold();
        eprintln!("{} {}", yellow.apply_to("!"), message);
        if self.wait_for_enter {
            let dim = Style::new().dim();
            eprint!("{}", dim.apply_to("  (press Enter to continue) "));
            let _ = std::io::stderr().flush();
            let _ = Self::read_line();
        }
    }

    fn prompt_user(&self, message: &str) -> Option<String> {
        let cyan = Style::new().cyan().bold();
        eprint!("{} {} ", cyan.apply_to("?"), message);
        let _ = std::io::stderr().flush();

        if let Some(answer) = self.answers.lock().pop_front() {
            eprintln!("{}", answer);
            return Some(answer);
        }

        let answer = Self::read_line();
        if answer.is_none() {
            eprintln!();
        }
        answer
    }

    fn reload_host(&self) {
        tracing::debug!("Reload requested");
        *self.requested.lock() = Some(TerminalAction::Refresh);
    }

    fn close_host(&self) {
        tracing::debug!("Close requested");
        *self.requested.lock() = Some(TerminalAction::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_used_first() {
        let host = TerminalHost::new(vec!["Ada".into(), String::new()], false);
        assert_eq!(host.prompt_user("Name?").as_deref(), Some("Ada"));
        assert_eq!(host.prompt_user("Again?").as_deref(), Some(""));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_read_inside_multi_thread_runtime() {
        let ticker = tokio::spawn(async { 7 });
        assert_eq!(blocking(|| 42), 42);
        assert_eq!(ticker.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_blocking_read_on_current_thread_runtime() {
        assert_eq!(blocking(|| "line"), "line");
    }

    #[test]
    fn test_blocking_read_outside_runtime() {
        assert_eq!(blocking(|| 1), 1);
    }

    #[test]
    fn test_records_terminal_requests() {
        let host = TerminalHost::new(Vec::new(), false);
        assert_eq!(host.requested(), None);
        host.reload_host();
        assert_eq!(host.requested(), Some(TerminalAction::Refresh));
        host.close_host();
        assert_eq!(host.requested(), Some(TerminalAction::Close));
    }
}
