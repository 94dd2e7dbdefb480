use std::time::Duration;

use tokio::sync::watch;

use crate::domain::value_objects::BlockhashWindow;

/// The one piece of state the poller shares with a send loop: the latest
/// block height it observed and whether it has resolved.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SendSignal {
    pub observed_height: Option<u64>,
    pub stopped: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GateState {
    Open,
    Stopped,
    Expired { observed_height: u64 },
}

pub fn send_signal() -> (SignalPublisher, SendGate) {
    let (sender, receiver) = watch::channel(SendSignal::default());
    (SignalPublisher { sender }, SendGate { receiver })
}

/// Poller side.
#[derive(Debug)]
pub struct SignalPublisher {
    sender: watch::Sender<SendSignal>,
}

impl SignalPublisher {
    pub fn observe_height(&self, height: u64) {
        self.sender.send_if_modified(|signal| {
            if signal.observed_height == Some(height) {
                return false;
            }
            signal.observed_height = Some(height);
            true
        });
    }

    pub fn stop(&self) {
        self.sender.send_modify(|signal| signal.stopped = true);
    }
}

/// Send-loop side.
#[derive(Debug)]
pub struct SendGate {
    receiver: watch::Receiver<SendSignal>,
}

impl SendGate {
    /// Must be consulted before every send attempt.
    pub fn check(&self, window: &BlockhashWindow) -> GateState {
        let signal = *self.receiver.borrow();
        if signal.stopped {
            return GateState::Stopped;
        }

        match signal.observed_height {
            Some(observed_height) if window.is_expired(observed_height) => {
                GateState::Expired { observed_height }
            }
            Some(_) | None => GateState::Open,
        }
    }

    /// Sleeps for `interval` unless the poller stops first. Returns `false`
    /// when the loop should not send again.
    pub async fn pause(&mut self, interval: Duration) -> bool {
        let sleep = tokio::time::sleep(interval);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                () = &mut sleep => return !self.receiver.borrow().stopped,
                changed = self.receiver.changed() => {
                    if changed.is_err() || self.receiver.borrow_and_update().stopped {
                        return false;
                    }
                }
            }
        }
    }
}
