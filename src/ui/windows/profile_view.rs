//! Density-profile window: the newest snapshot's bucket densities as a bar
//! chart, the per-step field the heatmap integrates over time.

use crate::ui::window::{AppState, AppWindow};
use eframe::egui::{self, Color32};
use egui_plot::{Bar, BarChart, Plot};

pub struct ProfileView {
    open: bool,
}

impl Default for ProfileView {
    fn default() -> Self {
        Self { open: false }
    }
}

impl AppWindow for ProfileView {
    fn name(&self) -> &str {
        "Density Profile"
    }
    fn is_open(&self) -> bool {
        self.open
    }
    fn toggle(&mut self) {
        self.open = !self.open;
    }

    fn show(&mut self, ctx: &egui::Context, state: &AppState<'_>) {
        egui::Window::new(self.name())
            .open(&mut self.open)
            .default_size(egui::Vec2::new(480.0, 300.0))
            .show(ctx, |ui| {
                let Some(snapshot) = state.result.snapshots.last() else {
                    ui.label("No snapshot yet.");
                    return;
                };

                ui.label(format!(
                    "{} buckets | step max {:.2} | global max {:.2}",
                    snapshot.buckets.len(),
                    snapshot.max_density(),
                    state.result.global_max_density,
                ));

                let global_max = state.result.global_max_density.max(f64::EPSILON);
                let bars: Vec<Bar> = snapshot
                    .buckets
                    .iter()
                    .map(|b| {
                        // Brighter toward the global maximum.
                        let t = (b.density / global_max) as f32;
                        let intensity = 80 + (t * 175.0) as u8;
                        Bar::new(b.price_floor + state.bucket_size / 2.0, b.density)
                            .width(state.bucket_size * 0.9)
                            .fill(Color32::from_rgb(intensity, intensity / 3, 0))
                    })
                    .collect();

                Plot::new("density_profile")
                    .allow_scroll(false)
                    .show_axes([true, true])
                    .show(ui, |plot_ui| {
                        plot_ui.bar_chart(BarChart::new("density", bars));
                    });
            });
    }
}
