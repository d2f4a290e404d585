/*!
 * Hand-off from background workers to the UI thread
 *
 * Workers never touch editor state. They post messages through a
 * [`UiHandle`]; the UI thread drains them into its message area with
 * [`UiLoop::pump`].
 */

use std::time::Duration;

use chadtree_host::MessageArea;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

/// Something for the UI thread to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMessage {
    /// Show `message` in the message area, styled as an error if `error`
    Write { message: String, error: bool },
}

/// Create a connected handle/loop pair
pub fn ui_channel() -> (UiHandle, UiLoop) {
    let (tx, rx) = unbounded();
    (UiHandle { tx }, UiLoop { rx })
}

/// Thread-safe sender side, cloned into every background task
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: Sender<UiMessage>,
}

impl UiHandle {
    pub fn write(&self, message: impl Into<String>, error: bool) {
        let message = message.into();
        if self
            .tx
            .send(UiMessage::Write { message, error })
            .is_err()
        {
            tracing::warn!("UI loop is gone, dropping message");
        }
    }
}

/// Receiver side, owned by the UI thread
#[derive(Debug)]
pub struct UiLoop {
    rx: Receiver<UiMessage>,
}

impl UiLoop {
    /// Apply every message already queued. Never blocks.
    pub fn pump(&self, area: &mut dyn MessageArea) -> usize {
        let mut applied = 0;
        for msg in self.rx.try_iter() {
            apply(area, msg);
            applied += 1;
        }
        applied
    }

    /// Wait up to `timeout` for the first message, then drain the rest.
    ///
    /// Returns 0 on timeout or once every handle has been dropped.
    pub fn pump_timeout(&self, area: &mut dyn MessageArea, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => {
                apply(area, msg);
                1 + self.pump(area)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    /// Messages waiting to be applied
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

fn apply(area: &mut dyn MessageArea, msg: UiMessage) {
    match msg {
        UiMessage::Write { message, error } => area.write(&message, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_pump_drains_in_order() {
        let (handle, ui) = ui_channel();
        handle.write("one", false);
        handle.write("two", true);

        let mut area: Vec<(String, bool)> = Vec::new();
        assert_eq!(ui.len(), 2);
        assert_eq!(ui.pump(&mut area), 2);
        assert!(ui.is_empty());
        assert_eq!(
            area,
            vec![("one".to_string(), false), ("two".to_string(), true)]
        );
    }

    #[test]
    fn test_pump_on_empty_queue() {
        let (_handle, ui) = ui_channel();
        let mut area: Vec<(String, bool)> = Vec::new();
        assert_eq!(ui.pump(&mut area), 0);
        assert_eq!(ui.pump_timeout(&mut area, Duration::from_millis(10)), 0);
    }

    #[test]
    fn test_messages_from_other_threads_apply_on_pumping_thread() {
        struct ThreadArea(Vec<thread::ThreadId>);
        impl MessageArea for ThreadArea {
            fn write(&mut self, _message: &str, _error: bool) {
                self.0.push(thread::current().id());
            }
        }

        let (handle, ui) = ui_channel();
        thread::spawn(move || handle.write("from worker", true))
            .join()
            .unwrap();

        let mut area = ThreadArea(Vec::new());
        assert_eq!(ui.pump_timeout(&mut area, Duration::from_secs(1)), 1);
        assert_eq!(area.0, vec![thread::current().id()]);
    }

    #[test]
    fn test_write_after_loop_dropped_does_not_panic() {
        let (handle, ui) = ui_channel();
        drop(ui);
        handle.write("nobody listening", true);
    }
}
