//! Command orchestration from shell actions to the backend command queue.

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    Notification, Severity, ToastPosition, UiError, UiErrorContext, UiEvent, UserAction,
};
use crate::controller::reducer::{reduce_ui_event, reduce_user_action, ConsoleState};

/// Queues `cmd` for the backend worker. Returns `false` and raises a
/// notification when the queue cannot take it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    state: &mut ConsoleState,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued shell->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "shell->backend command queue is full");
            state.notifications.push(Notification::new(
                Severity::Error,
                ToastPosition::Center,
                "Command queue is full; please retry",
            ));
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "shell->backend command queue disconnected");
            let err = UiError::from_message(
                UiErrorContext::BackendStartup,
                "backend worker disconnected (runtime failure)",
            );
            state.notifications.push(
                Notification::new(Severity::Error, ToastPosition::Center, "Backend unavailable")
                    .with_detail(err.message()),
            );
            state.last_error = Some(err);
            false
        }
    }
}

/// Owns the shell state and feeds it user actions and backend completions.
pub struct ConsoleDriver {
    state: ConsoleState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    pending: usize,
}

impl ConsoleDriver {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            state: ConsoleState::default(),
            cmd_tx,
            ui_rx,
            pending: 0,
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConsoleState {
        &mut self.state
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn act(&mut self, action: UserAction) {
        let commands = reduce_user_action(&mut self.state, action);
        self.dispatch_all(commands);
    }

    /// Blocks until every queued command, including follow-ups raised by
    /// their completions, has reported back.
    pub fn settle(&mut self) {
        while self.pending > 0 {
            let Ok(event) = self.ui_rx.recv() else {
                tracing::error!(pending = self.pending, "backend worker exited early");
                self.pending = 0;
                break;
            };
            self.pending -= 1;
            let follow_ups = reduce_ui_event(&mut self.state, event);
            self.dispatch_all(follow_ups);
        }
    }

    fn dispatch_all(&mut self, commands: Vec<BackendCommand>) {
        for cmd in commands {
            if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state) {
                self.pending += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
