use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustySeirasApp {
    pub state: AppState,
}

impl eframe::App for RustySeirasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: processing steps ----
        egui::SidePanel::left("steps_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot or table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.show_table {
                plot::table_preview(ui, &self.state);
            } else {
                plot::spectral_plot(ui, &self.state);
            }
        });
    }
}
