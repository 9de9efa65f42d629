//! Background WebSocket + REST client for Binance futures kline streams.

use crate::error::Result;
use crate::network::{AppMessage, Control};
use crate::types::{Candle, ExchangeInfo, KlineEvent, RestKline};
use futures_util::{SinkExt, StreamExt};
use reqwest::blocking;
use std::sync::mpsc::Sender as StdSender;
use tokio::sync::mpsc::Receiver;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};

/// Kline interval for both the history fetch and the live stream.
const INTERVAL: &str = "1m";

/// Number of historical candles fetched on connect (Binance caps at 1500).
const HISTORY_LIMIT: usize = 1000;

// ── Precision Helper ───────────────────────────────────────────────────────────

/// Fetch the price precision (decimal places of the tick size) for a futures
/// symbol from the Binance exchange-info endpoint.
///
/// Used only for display formatting. Defaults to `2` on any failure.
pub fn fetch_precision(symbol: &str) -> usize {
    let mut price_prec: usize = 2;

    let url = "https://fapi.binance.com/fapi/v1/exchangeInfo";
    let info: ExchangeInfo = match blocking::get(url).and_then(|r| r.json::<ExchangeInfo>()) {
        Ok(info) => info,
        Err(e) => {
            log::warn!("fetch_precision: {e}");
            return price_prec;
        }
    };

    let Some(sym_info) = info.symbols.into_iter().find(|s| s.symbol == symbol) else {
        log::warn!("fetch_precision: symbol {symbol} not found");
        return price_prec;
    };

    for filter in sym_info.filters {
        if filter.filter_type == "PRICE_FILTER" {
            if let Some(ts) = filter.tick_size {
                if let Ok(tick_size) = ts.parse::<f64>() {
                    if tick_size > 0.0 {
                        price_prec = (-tick_size.log10()).ceil() as usize;
                    }
                }
            }
        }
    }

    price_prec
}

// ── History fetch ──────────────────────────────────────────────────────────────

/// Fetch the most recent [`HISTORY_LIMIT`] closed candles for `symbol`.
async fn fetch_klines(client: &reqwest::Client, symbol: &str) -> Result<Vec<Candle>> {
    let url = format!(
        "https://fapi.binance.com/fapi/v1/klines?symbol={}&interval={INTERVAL}&limit={HISTORY_LIMIT}",
        symbol.to_uppercase()
    );
    let rows: Vec<RestKline> = client.get(&url).send().await?.json().await?;
    Ok(rows.into_iter().map(Candle::from).collect())
}

// ── Streaming Loop ─────────────────────────────────────────────────────────────

/// Long-running async loop: fetches the candle history over REST, subscribes
/// to the live kline stream, and forwards [`AppMessage`]s to the UI thread.
///
/// Exits cleanly when the `control_rx` channel is closed (UI shut down).
pub async fn run_streaming_loop(
    tx: &StdSender<AppMessage>,
    ctx: &egui::Context,
    mut control_rx: Receiver<Control>,
    mut symbol: String,
) {
    loop {
        let ws_url = format!("wss://fstream.binance.com/ws/{symbol}@kline_{INTERVAL}");

        let (mut ws_stream, response) = match connect_async(&ws_url).await {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("WebSocket connection error: {e}");
                return;
            }
        };
        log::info!("WebSocket connected: {response:?}");

        // Spawn a task that drains the WebSocket and forwards kline updates.
        let tx_clone = tx.clone();
        let ctx_clone = ctx.clone();
        let ws_handle = tokio::spawn(async move {
            while let Some(result) = ws_stream.next().await {
                match result {
                    Ok(WsMessage::Text(text)) => {
                        let Ok(event) = serde_json::from_str::<KlineEvent>(&text) else {
                            continue;
                        };
                        let _ = tx_clone.send(AppMessage::Kline(Candle::from(&event.kline)));
                        ctx_clone.request_repaint();
                    }
                    Ok(WsMessage::Ping(payload)) => {
                        if let Err(e) = ws_stream.send(WsMessage::Pong(payload)).await {
                            log::warn!("Pong send error: {e}");
                            break;
                        }
                    }
                    Ok(WsMessage::Pong(_)) => {}
                    Ok(WsMessage::Close(_)) => {
                        log::info!("Connection closed by server.");
                        break;
                    }
                    Err(e) => {
                        log::warn!("WebSocket error: {e}");
                        break;
                    }
                    _ => {}
                }
            }
        });

        // Fetch the candle history concurrently with the live stream.
        match fetch_klines(&reqwest::Client::new(), &symbol).await {
            Ok(candles) => {
                log::info!("Fetched {} candles for {symbol}.", candles.len());
                let _ = tx.send(AppMessage::History(candles));
                ctx.request_repaint();
            }
            Err(e) => log::error!("Kline history error: {e}"),
        }

        // Wait for a control command (Refetch or ChangeSymbol) before looping.
        match control_rx.recv().await {
            Some(ctrl) => {
                ws_handle.abort();
                match ctrl {
                    Control::Refetch => log::info!("Refetch triggered, restarting connection."),
                    Control::ChangeSymbol(new_symbol) => {
                        symbol = new_symbol;
                        log::info!("Changing symbol to {symbol}, restarting connection.");
                    }
                }
            }
            None => break, // UI shut down — exit cleanly
        }
    }
}
