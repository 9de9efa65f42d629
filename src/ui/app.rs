//! Application orchestrator: owns the candle series and the published engine
//! result, and drives the window system.

use std::sync::mpsc::{self as std_mpsc, Receiver as StdReceiver};
use std::thread;
use std::time::Instant;

use crate::engine;
use crate::engine::aggregate::EngineResult;
use crate::network::{AppMessage, Control, client};
use crate::types::Candle;
use crate::ui::window::{AppState, AppWindow};
use crate::ui::windows::{heatmap_view::HeatmapView, profile_view::ProfileView};
use eframe::egui;
use tokio::sync::mpsc::{self as tokio_mpsc, Sender as TokioSender};

/// Default bucket size as a percentage of the last close.
const DEFAULT_BUCKET_PCT: f64 = 0.25;

/// The top-level application, implementing [`eframe::App`].
///
/// The engine run is a one-shot synchronous batch triggered whenever the
/// candle series, leverage, or bucket size change; its output replaces the
/// published [`EngineResult`] wholesale (last-write-wins), and the render
/// path only ever reads it.
pub struct App {
    symbol: String,
    edited_symbol: String,
    rx: StdReceiver<AppMessage>,
    control_tx: TokioSender<Control>,

    // ── Engine input / output ──────────────────────────────────────────────
    candles: Vec<Candle>,
    leverage: f64,
    /// Bucket size as a percentage of the last close.
    bucket_pct: f64,
    result: EngineResult,
    /// Absolute bucket size the published result was computed with.
    bucket_size: f64,

    price_prec: usize,

    // ── Window registry ────────────────────────────────────────────────────
    windows: Vec<Box<dyn AppWindow>>,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, symbol: String) -> Self {
        let (tx, rx) = std_mpsc::channel();
        let (control_tx, control_rx) = tokio_mpsc::channel(1);
        let ctx = cc.egui_ctx.clone();
        let s = symbol.clone();

        // Spawn background Tokio runtime + WebSocket loop onto a dedicated OS thread.
        thread::spawn(move || {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build Tokio runtime")
                .block_on(client::run_streaming_loop(&tx, &ctx, control_rx, s));
        });

        let price_prec = client::fetch_precision(&symbol.to_uppercase());

        // Register all analytics windows. Adding a new window = one line here.
        let windows: Vec<Box<dyn AppWindow>> = vec![
            Box::new(HeatmapView::default()),
            Box::new(ProfileView::default()),
        ];

        Self {
            symbol: symbol.clone(),
            edited_symbol: symbol,
            rx,
            control_tx,
            candles: Vec::new(),
            leverage: 10.0,
            bucket_pct: DEFAULT_BUCKET_PCT,
            result: EngineResult::default(),
            bucket_size: 1.0,
            price_prec,
            windows,
        }
    }

    /// Resolve the absolute bucket size from the current series: a small
    /// fraction of the last known price, falling back to 1.0 with no data.
    fn resolve_bucket_size(&self) -> f64 {
        match self.candles.last() {
            Some(c) if c.close > 0.0 => c.close * self.bucket_pct / 100.0,
            _ => 1.0,
        }
    }

    /// Re-run the whole simulation and publish the fresh result.
    fn recompute(&mut self) {
        let bucket_size = self.resolve_bucket_size();
        let started = Instant::now();
        match engine::run(&self.candles, self.leverage, bucket_size) {
            Ok(result) => {
                log::debug!(
                    "engine run: {} candles -> {} snapshots, global max {:.2}, {:?}",
                    self.candles.len(),
                    result.snapshots.len(),
                    result.global_max_density,
                    started.elapsed(),
                );
                self.result = result;
                self.bucket_size = bucket_size;
            }
            Err(e) => {
                // Configuration error: keep nothing rather than stale output.
                log::warn!("engine run refused: {e}");
                self.result = EngineResult::default();
            }
        }
    }

    /// Full reset — called on symbol change.
    fn reset_all(&mut self) {
        self.candles.clear();
        self.result = EngineResult::default();
    }

    /// Merge a live kline update into the series. The in-progress bar
    /// replaces the last candle in place; a newly opened bar appends.
    fn on_kline(&mut self, candle: Candle) {
        match self.candles.last_mut() {
            Some(last) if last.time == candle.time => *last = candle,
            Some(last) if candle.time > last.time => self.candles.push(candle),
            Some(_) => return, // stale out-of-order update
            None => self.candles.push(candle),
        }
        self.recompute();
    }
}

// ── eframe::App ────────────────────────────────────────────────────────────────

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── 1. Drain incoming messages ────────────────────────────────────────
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                AppMessage::History(candles) => {
                    self.candles = candles;
                    self.recompute();
                }
                AppMessage::Kline(candle) => self.on_kline(candle),
            }
        }

        // ── 2. Central panel ──────────────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(format!(
                "{} Liquidation Density",
                self.symbol.to_uppercase()
            ));

            // Toggle buttons for all windows.
            ui.horizontal_wrapped(|ui| {
                for w in &mut self.windows {
                    if ui.button(format!("Toggle {}", w.name())).clicked() {
                        w.toggle();
                    }
                }
            });

            // Symbol change bar.
            ui.horizontal(|ui| {
                ui.label("Symbol:");
                ui.text_edit_singleline(&mut self.edited_symbol);
                if ui.button("Change Symbol").clicked() && self.edited_symbol != self.symbol {
                    self.price_prec = client::fetch_precision(&self.edited_symbol.to_uppercase());
                    let _ = self
                        .control_tx
                        .try_send(Control::ChangeSymbol(self.edited_symbol.clone()));
                    self.symbol = self.edited_symbol.clone();
                    self.reset_all();
                }
                if ui.button("Refetch").clicked() {
                    let _ = self.control_tx.try_send(Control::Refetch);
                }
            });

            // Simulation parameters: any change triggers a full re-run.
            let before = (self.leverage, self.bucket_pct);
            ui.horizontal(|ui| {
                ui.label("Leverage:");
                ui.add(egui::Slider::new(&mut self.leverage, 2.0..=125.0).logarithmic(true));
                ui.label("Bucket (% of price):");
                ui.add(egui::Slider::new(&mut self.bucket_pct, 0.05..=2.0));
            });
            if (self.leverage, self.bucket_pct) != before {
                self.recompute();
            }

            ui.add_space(4.0);
            ui.label(format!(
                "{} candles | {} snapshots | global max density {:.2}",
                self.candles.len(),
                self.result.snapshots.len(),
                self.result.global_max_density,
            ));
        });

        // ── 3. Floating analytics windows ─────────────────────────────────────
        let state = AppState {
            candles: &self.candles,
            result: &self.result,
            bucket_size: self.bucket_size,
            leverage: self.leverage,
            price_prec: self.price_prec,
        };
        for w in &mut self.windows {
            w.show(ctx, &state);
        }
    }
}
