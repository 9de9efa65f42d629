//! Network layer: inter-thread message types for the kline client.

pub mod client;

use crate::types::Candle;

/// Messages sent from the background network task to the UI thread.
pub enum AppMessage {
    /// Full historical candle series (REST), ordered ascending by time.
    History(Vec<Candle>),
    /// Live update for the newest (possibly still open) candle.
    Kline(Candle),
}

/// Control commands sent from the UI thread to the background network task.
pub enum Control {
    Refetch,
    ChangeSymbol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // The UI sends these with `try_send` on a bounded channel; both command
    // kinds must arrive in order without a running runtime.
    #[test]
    fn control_channel_delivers_commands_in_order() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(2);
        tx.try_send(Control::Refetch).unwrap();
        tx.try_send(Control::ChangeSymbol("ethusdt".to_string()))
            .unwrap();

        assert!(matches!(rx.try_recv(), Ok(Control::Refetch)));
        assert!(matches!(rx.try_recv(), Ok(Control::ChangeSymbol(s)) if s == "ethusdt"));
    }
}
