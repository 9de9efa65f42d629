//! The `AppWindow` trait and the shared `AppState` view passed to each window.
//!
//! To add a new analytics window:
//! 1. Create a new file in `ui/windows/`.
//! 2. Implement `AppWindow` for your struct.
//! 3. Push `Box::new(MyWindow::default())` into `App::windows` in `App::new()`.

use crate::engine::aggregate::EngineResult;
use crate::types::Candle;

/// Read-only view of the candle series and the published engine result,
/// shared with every window's `show` call.
///
/// Windows keep their own render settings (sliders, toggles); the engine
/// output itself is never mutated by the render path.
pub struct AppState<'a> {
    pub candles: &'a [Candle],
    pub result: &'a EngineResult,
    /// Absolute bucket size used for the published result.
    pub bucket_size: f64,
    pub leverage: f64,
    /// Decimal places for price display.
    pub price_prec: usize,
}

/// Trait implemented by every analytics window/panel.
///
/// Each window owns its own open/closed flag and any window-specific UI state.
/// The orchestrator (`App`) simply iterates over all registered windows and
/// calls `show` on each frame.
pub trait AppWindow {
    /// Display name shown on the toggle button and as the egui window title.
    fn name(&self) -> &str;

    /// Whether this window is currently visible.
    #[allow(dead_code)]
    fn is_open(&self) -> bool;

    /// Toggle the window's open/closed state.
    fn toggle(&mut self);

    /// Draw the window contents. Called every frame by `App::update`.
    fn show(&mut self, ctx: &egui::Context, state: &AppState<'_>);
}
