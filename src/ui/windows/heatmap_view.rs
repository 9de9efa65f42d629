//! Heatmap window: the liquidation-density viewport renderer.
//!
//! Runs every frame, so the hot loop is culled before any work: only time
//! steps inside the visible index range are walked, and within each only
//! buckets inside the visible price range, each painted as one rect via a
//! quantized LUT lookup. The LUT and normalization denominator are computed
//! once per frame, never per cell.

use crate::engine::normalize::{self, NormalizeParams};
use crate::ui::colors::{ColorLut, THEMES, Theme, VisualMode};
use crate::ui::window::{AppState, AppWindow};
use crate::utils::format_time;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, vec2};

/// Height of the heatmap canvas in points.
const CANVAS_HEIGHT: f32 = 380.0;

pub struct HeatmapView {
    open: bool,
    norm: NormalizeParams,
    lut: ColorLut,
    theme_index: usize,
    banded: bool,
    /// Pixel width of one time step.
    cell_width: f32,
    /// Candles scrolled back from the newest one (drag to pan).
    pan_offset: usize,
}

impl Default for HeatmapView {
    fn default() -> Self {
        Self {
            open: true,
            norm: NormalizeParams::default(),
            lut: ColorLut::default(),
            theme_index: 0,
            banded: false,
            cell_width: 3.0,
            pan_offset: 0,
        }
    }
}

impl HeatmapView {
    fn theme(&self) -> Theme {
        THEMES[self.theme_index].1
    }

    fn mode(&self) -> VisualMode {
        if self.banded {
            VisualMode::Banded
        } else {
            VisualMode::Gradient
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Noise filter:");
            ui.add(egui::Slider::new(&mut self.norm.noise_filter, 0.0..=0.9));
            ui.label("Sensitivity:");
            ui.add(egui::Slider::new(&mut self.norm.sensitivity, 0.1..=10.0).logarithmic(true));
        });
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.norm.local, "Local normalization");
            ui.checkbox(&mut self.banded, "Banded");
            egui::ComboBox::from_label("Theme")
                .selected_text(THEMES[self.theme_index].0)
                .show_ui(ui, |ui| {
                    for (i, (name, _)) in THEMES.iter().enumerate() {
                        ui.selectable_value(&mut self.theme_index, i, *name);
                    }
                });
            ui.label("Cell width:");
            ui.add(egui::Slider::new(&mut self.cell_width, 1.0..=12.0));
        });
    }

    fn paint(&mut self, ui: &mut egui::Ui, state: &AppState<'_>) {
        let snapshots = &state.result.snapshots;
        if snapshots.is_empty() || state.candles.is_empty() {
            ui.label("No heatmap data yet.");
            return;
        }

        let desired = vec2(ui.available_width(), CANVAS_HEIGHT);
        let (response, painter) = ui.allocate_painter(desired, Sense::click_and_drag());
        let rect = response.rect;
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return; // layout not ready this frame
        }

        // ── Visible time-index window ─────────────────────────────────────
        let visible = (rect.width() / self.cell_width).ceil() as usize;
        if response.dragged() {
            let shift = (response.drag_delta().x / self.cell_width) as isize;
            self.pan_offset = self.pan_offset.saturating_add_signed(shift);
        }
        // Re-clamp every frame; the series may have shrunk on symbol change.
        self.pan_offset = self.pan_offset.min(snapshots.len().saturating_sub(visible));
        let end = snapshots.len() - self.pan_offset;
        let start = end.saturating_sub(visible);
        if start >= end {
            return;
        }

        // ── Visible price window ──────────────────────────────────────────
        // Centered on the visible candles, padded so the liquidation band
        // implied by the leverage fits.
        let (mut low, mut high) = (f64::INFINITY, f64::NEG_INFINITY);
        for c in &state.candles[start..end.min(state.candles.len())] {
            low = low.min(c.low);
            high = high.max(c.high);
        }
        if !(low.is_finite() && high.is_finite()) {
            return;
        }
        let last_close = state.candles[end.min(state.candles.len()) - 1].close;
        let pad = (last_close / state.leverage) * 1.25;
        let price_lo = low - pad;
        let price_hi = high + pad;
        let span = price_hi - price_lo;
        if span <= 0.0 {
            return;
        }

        let y_of = |price: f64| -> f32 {
            rect.bottom() - ((price - price_lo) / span) as f32 * rect.height()
        };

        // ── Per-frame render state (no per-cell allocation) ───────────────
        self.lut.rebuild_if_changed(self.theme(), self.mode());
        let effective_max = normalize::effective_max(
            state.result,
            start..end,
            (price_lo, price_hi),
            state.bucket_size,
            self.norm.local,
        );
        let bucket_px = ((state.bucket_size / span) as f32 * rect.height()).max(1.0);

        painter.rect_filled(rect, 0.0, Color32::from_gray(10));

        for (i, snapshot) in snapshots[start..end].iter().enumerate() {
            let x = rect.left() + i as f32 * self.cell_width;
            for bucket in &snapshot.buckets {
                if bucket.price_floor + state.bucket_size < price_lo
                    || bucket.price_floor > price_hi
                {
                    continue;
                }
                let Some(level) = normalize::normalize(bucket.density, effective_max, &self.norm)
                else {
                    continue;
                };
                let y = y_of(bucket.price_floor + state.bucket_size);
                let cell = Rect::from_min_size(Pos2::new(x, y), vec2(self.cell_width, bucket_px));
                painter.rect_filled(cell, 0.0, self.lut.sample(level));
            }
        }

        // ── Close-price overlay ───────────────────────────────────────────
        let line: Vec<Pos2> = state.candles[start..end.min(state.candles.len())]
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Pos2::new(
                    rect.left() + (i as f32 + 0.5) * self.cell_width,
                    y_of(c.close),
                )
            })
            .collect();
        if line.len() >= 2 {
            painter.add(Shape::line(line, Stroke::new(1.0, Color32::WHITE)));
        }

        // ── Cursor read-out (nearest bucket) ──────────────────────────────
        if let Some(pos) = response.hover_pos() {
            let index = start + ((pos.x - rect.left()) / self.cell_width) as usize;
            let price = price_lo + ((rect.bottom() - pos.y) / rect.height()) as f64 * span;
            if let Some(snapshot) = snapshots.get(index) {
                let text = match snapshot.nearest_bucket(price) {
                    Some(bucket) => {
                        let level = normalize::normalize(bucket.density, effective_max, &self.norm);
                        format!(
                            "{} | {:.prec$} | density {:.2} ({})",
                            format_time(snapshot.time),
                            bucket.price_floor,
                            bucket.density,
                            match level {
                                Some(l) => format!("{l:.2}"),
                                None => "filtered".to_string(),
                            },
                            prec = state.price_prec,
                        )
                    }
                    None => format!("{} | no active levels", format_time(snapshot.time)),
                };
                painter.text(
                    rect.left_top() + vec2(6.0, 6.0),
                    Align2::LEFT_TOP,
                    text,
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            }
        }
    }
}

impl AppWindow for HeatmapView {
    fn name(&self) -> &str {
        "Liquidation Heatmap"
    }
    fn is_open(&self) -> bool {
        self.open
    }
    fn toggle(&mut self) {
        self.open = !self.open;
    }

    fn show(&mut self, ctx: &egui::Context, state: &AppState<'_>) {
        let mut open = self.open;
        egui::Window::new(self.name())
            .open(&mut open)
            .default_width(760.0)
            .show(ctx, |ui| {
                self.controls(ui);
                ui.add_space(6.0);
                self.paint(ui, state);
            });
        self.open = open;
    }
}
