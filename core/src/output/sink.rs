use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::item::OutputLine;

/// Receiving side of a job's output: the host's output view.
pub trait OutputSink: Send {
    fn append(&mut self, line: OutputLine);
}

impl OutputSink for Vec<OutputLine> {
    fn append(&mut self, line: OutputLine) {
        self.push(line);
    }
}

/// Sending half handed to a job. Unbounded so the child process never waits
/// for the sink to drain.
#[derive(Clone)]
pub struct OutputTx {
    tx: mpsc::UnboundedSender<OutputLine>,
    sent: Arc<AtomicU64>,
}

pub type OutputRx = mpsc::UnboundedReceiver<OutputLine>;

pub fn output_channel() -> (OutputTx, OutputRx) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        OutputTx {
            tx,
            sent: Arc::new(AtomicU64::new(0)),
        },
        rx,
    )
}

impl OutputTx {
    pub fn send(&self, line: OutputLine) {
        if self.tx.send(line).is_err() {
            tracing::debug!(
                target: "cargo_bridge.output",
                "output receiver closed, line dropped"
            );
            return;
        }
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

/// Forwards every line from `rx` to `sink` until all senders are gone.
pub async fn drain_into<S: OutputSink + ?Sized>(mut rx: OutputRx, sink: &mut S) -> u64 {
    let mut count = 0u64;
    while let Some(line) = rx.recv().await {
        sink.append(line);
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::item::{Category, OutputItem};

    #[tokio::test]
    async fn drain_preserves_order() {
        let (tx, rx) = output_channel();
        tx.send(OutputLine::Echo {
            text: "echo".into(),
        });
        tx.send(OutputLine::Item(OutputItem::plain("a", Category::Standard)));
        assert_eq!(tx.sent_count(), 2);
        drop(tx);

        let mut lines: Vec<OutputLine> = Vec::new();
        let n = drain_into(rx, &mut lines).await;
        assert_eq!(n, 2);
        assert_eq!(lines[0].text(), "echo");
        assert_eq!(lines[1].text(), "a");
    }

    #[test]
    fn send_after_receiver_dropped_is_silent() {
        let (tx, rx) = output_channel();
        drop(rx);
        tx.send(OutputLine::Echo { text: "x".into() });
        assert_eq!(tx.sent_count(), 0);
    }
}
