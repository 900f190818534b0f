use tokio::sync::mpsc;

/// Sending half of the "redraw pending" slot.
///
/// The channel holds at most one pending redraw; notifying while one is
/// already queued does nothing, so bursts of changes collapse into a single
/// frame.
#[derive(Debug, Clone)]
pub struct RedrawSignal {
    tx: mpsc::Sender<()>,
}

impl RedrawSignal {
    /// Never blocks. Returns false when a redraw was already pending or the
    /// display has gone away.
    pub fn notify(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }
}

pub fn redraw_channel() -> (RedrawSignal, mpsc::Receiver<()>) {
    let (tx, rx) = mpsc::channel(1);
    (RedrawSignal { tx }, rx)
}
