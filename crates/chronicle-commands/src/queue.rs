//! The submit side of the single-writer command queue.
//!
//! Commands cross from any task to the authoritative task through an
//! unbounded mpsc channel; each carries a oneshot for its result. The
//! submitter waits on the oneshot with a bounded timeout. There is no
//! cancellation path: a command whose submitter has timed out still
//! executes, and its reply is dropped on the floor.

use std::time::Duration;

use chronicle_types::{BulkCommand, BulkCommandResult, BulkItemResult, Command, CommandResult};
use tokio::sync::{mpsc, oneshot};

/// A command in flight to the authoritative task.
pub struct QueuedCommand {
    /// The wire command as submitted.
    pub command: Command,
    /// Where the executor sends the result. Send failures are ignored;
    /// they mean the submitter stopped waiting.
    pub reply: oneshot::Sender<CommandResult>,
}

/// Handle for submitting commands to the authoritative task.
///
/// Cheap to clone; every HTTP handler submitting a command holds one.
#[derive(Clone)]
pub struct CommandClient {
    sender: mpsc::UnboundedSender<QueuedCommand>,
    timeout: Duration,
}

impl CommandClient {
    /// Create a client plus the receiver the authoritative task drains.
    ///
    /// `timeout` bounds how long a submitter waits per command; the queue
    /// itself is unbounded.
    pub fn channel(timeout: Duration) -> (Self, mpsc::UnboundedReceiver<QueuedCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender, timeout }, receiver)
    }

    /// Submit one command and wait for its result.
    ///
    /// Never returns an error: queue closure and timeout both surface as
    /// failed [`CommandResult`]s.
    pub async fn submit(&self, command: Command) -> CommandResult {
        let request_id = command.request_id.clone();
        let (reply, receipt) = oneshot::channel();
        if self.sender.send(QueuedCommand { command, reply }).is_err() {
            return CommandResult::failed(request_id, "command executor is not running");
        }
        match tokio::time::timeout(self.timeout, receipt).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => CommandResult::failed(request_id, "command executor dropped the reply"),
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "command submit timed out");
                CommandResult::failed(
                    request_id,
                    "timed out waiting for command execution; the command may still run",
                )
            }
        }
    }

    /// Submit an ordered batch.
    ///
    /// With `stopOnError` set, execution halts at the first failure and the
    /// remaining items never reach the queue; the result records the stop
    /// index and carries one entry per executed item only.
    pub async fn submit_bulk(&self, bulk: BulkCommand) -> BulkCommandResult {
        let total = bulk.commands.len();
        let mut results = Vec::with_capacity(total);
        let mut stopped_at_index = None;

        for (index, command) in bulk.commands.into_iter().enumerate() {
            let action = command.action.clone();
            let result = self.submit(command).await;
            let failed = !result.success;
            results.push(BulkItemResult {
                index,
                action,
                success: result.success,
                error: result.error,
            });
            if failed && bulk.stop_on_error {
                stopped_at_index = Some(index);
                break;
            }
        }

        let all_succeeded = results.len() == total && results.iter().all(|item| item.success);
        BulkCommandResult {
            request_id: bulk.request_id,
            all_succeeded,
            results,
            stopped_at_index,
        }
    }
}
