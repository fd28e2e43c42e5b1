// Scripted executor for tests and dry runs.
//
// Responses are keyed by substring. The most recently registered rule
// whose needle occurs in the command wins, so a test can override an
// earlier response. Each rule holds a queue of replies; the last one is
// repeated once the queue is drained. Unmatched commands succeed with
// empty output.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{CommandExecutor, ShellKind};
use crate::error::ExecError;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub shell: ShellKind,
    pub command: String,
}

type Reply = Result<String, String>;

#[derive(Debug)]
struct Rule {
    needle: String,
    replies: VecDeque<Reply>,
}

impl Rule {
    fn next(&mut self) -> Reply {
        if self.replies.len() > 1 {
            self.replies.pop_front().unwrap_or_else(|| Ok(String::new()))
        } else {
            self.replies.front().cloned().unwrap_or_else(|| Ok(String::new()))
        }
    }
}

/// In-memory [`CommandExecutor`] that records every command.
#[derive(Debug, Default)]
pub struct MockExecutor {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `output` to any command containing `needle`.
    pub fn respond(&self, needle: &str, output: &str) -> &Self {
        self.push_rule(needle, vec![Ok(output.to_owned())])
    }

    /// Reply with each of `outputs` in turn, repeating the last.
    pub fn respond_seq(&self, needle: &str, outputs: &[&str]) -> &Self {
        let replies = outputs.iter().map(|o| Ok((*o).to_owned())).collect();
        self.push_rule(needle, replies)
    }

    /// Fail any command containing `needle`, with `stderr` as the captured error.
    pub fn fail(&self, needle: &str, stderr: &str) -> &Self {
        self.push_rule(needle, vec![Err(stderr.to_owned())])
    }

    /// All commands seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded commands containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| c.command.contains(needle))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push_rule(&self, needle: &str, replies: Vec<Reply>) -> &Self {
        self.rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Rule {
                needle: needle.to_owned(),
                replies: replies.into(),
            });
        self
    }

    fn dispatch(&self, shell: ShellKind, command: &str) -> Result<String, ExecError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Invocation {
                shell,
                command: command.to_owned(),
            });

        let reply = self
            .rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter_mut()
            .rev()
            .find(|rule| command.contains(&rule.needle))
            .map_or_else(|| Ok(String::new()), Rule::next);

        reply.map_err(|stderr| ExecError::Failed {
            status: "exit status: 1".into(),
            stderr,
        })
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn run_shell(&self, command: &str) -> Result<String, ExecError> {
        self.dispatch(ShellKind::System, command)
    }

    async fn run_powershell(&self, command: &str) -> Result<String, ExecError> {
        self.dispatch(ShellKind::PowerShell, command)
    }
}
