//! Analytics windows: the heatmap viewport and the density-profile plot.

pub mod heatmap_view;
pub mod profile_view;
