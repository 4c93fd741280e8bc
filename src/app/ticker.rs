use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Handle for the repeating status-message timer. Armed on entry to the
/// uploading phase, disarmed on every exit from it. The stop flag is checked
/// before every send, so no tick is emitted after `disarm`; ticks already
/// queued die with the receiver when the handle is dropped.
pub struct MessageTicker {
    stop: Arc<AtomicBool>,
    ticks: Receiver<()>,
}

impl MessageTicker {
    pub fn arm(interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let (sender, ticks) = channel();

        let flag = Arc::clone(&stop);
        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::SeqCst) {
                break;
            }
            if sender.send(()).is_err() {
                break;
            }
        });

        Self { stop, ticks }
    }

    /// Consume every tick that has fired since the last drain.
    pub fn drain(&self) -> usize {
        let mut count = 0;
        while self.ticks.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    /// Synchronous and idempotent; safe to call from every exit transition.
    pub fn disarm(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    fn is_disarmed(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

impl Drop for MessageTicker {
    fn drop(&mut self) {
        self.disarm();
    }
}
