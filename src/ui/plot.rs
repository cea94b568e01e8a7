use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Line, Plot, PlotPoints};

use crate::color::spectrum_gradient;
use crate::state::AppState;

/// Above this many spectra the legend would bury the plot.
const MAX_LEGEND_ENTRIES: usize = 24;

// ---------------------------------------------------------------------------
// Spectral plot (central panel)
// ---------------------------------------------------------------------------

/// Render every spectrum of the working table, coloured by acquisition order.
pub fn spectral_plot(ui: &mut Ui, state: &AppState) {
    let table = match &state.table {
        Some(t) => t,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Combine a folder or open a table to view spectra");
            });
            return;
        }
    };

    let colors = spectrum_gradient(table.data_column_count());
    let mut plot = Plot::new("spectral_plot")
        .x_axis_label("Wavenumber (cm⁻¹)")
        .y_axis_label("Intensity")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if table.data_column_count() <= MAX_LEGEND_ENTRIES {
        plot = plot.legend(egui_plot::Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for (column, color) in table.columns.iter().zip(colors) {
            // Absent readings are skipped, not drawn as zero.
            let points: PlotPoints = table
                .wavenumber
                .iter()
                .zip(&column.values)
                .filter_map(|(&x, y)| y.map(|y| [x, y]))
                .collect();

            let line = Line::new(points)
                .name(&column.name)
                .color(color)
                .width(1.5);

            plot_ui.line(line);
        }
    });
}

// ---------------------------------------------------------------------------
// Table preview
// ---------------------------------------------------------------------------

/// Render the working table as a grid; absent cells are left blank.
pub fn table_preview(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        ui.label("No table loaded.");
        return;
    };

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(90.0))
            .columns(Column::auto().at_least(80.0), table.data_column_count())
            .header(20.0, |mut header| {
                for name in table.header() {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.n_rows(), |mut row| {
                    let i = row.index();
                    row.col(|ui| {
                        ui.label(format!("{:.1}", table.wavenumber[i]));
                    });
                    for column in &table.columns {
                        row.col(|ui| {
                            if let Some(v) = column.values.get(i).copied().flatten() {
                                ui.label(format!("{v:.6}"));
                            }
                        });
                    }
                });
            });
    });
}
