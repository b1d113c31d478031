use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::{comparison_color, fill_of};
use crate::data::metrics::{build_comparison, build_single, build_trend, extract};
use crate::data::model::{supported_years, Dataset, MetricKind};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the dashboard: single radar, comparison radar, trend grid and
/// the per-year detail table.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a metrics file to begin  (File → Open…)");
            });
            return;
        }
    };

    eframe::egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols: &mut [Ui]| {
                single_radar(&mut cols[0], dataset, state);
                comparison_radar(&mut cols[1], dataset, state);
            });
            ui.separator();
            trend_grid(ui, dataset, state);
            ui.separator();
            detail_table(ui, dataset, state);
        });
}

// ---------------------------------------------------------------------------
// Radar geometry helpers
// ---------------------------------------------------------------------------

/// Axis angle for the i-th metric: first axis points up, then clockwise.
fn axis_angle(i: usize) -> f64 {
    std::f64::consts::FRAC_PI_2 - i as f64 * std::f64::consts::TAU / 4.0
}

/// Polygon vertices for a normalized 4-metric vector.
fn radar_vertices(values: &[f64; 4]) -> Vec<[f64; 2]> {
    values
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let theta = axis_angle(i);
            [r * theta.cos(), r * theta.sin()]
        })
        .collect()
}

/// Background rings and spokes shared by both radar charts.
fn radar_grid(plot_ui: &mut egui_plot::PlotUi) {
    let grid_color = Color32::from_gray(90);

    for ring in [0.25, 0.5, 0.75, 1.0] {
        let circle: PlotPoints = (0..=64)
            .map(|i| {
                let theta = i as f64 / 64.0 * std::f64::consts::TAU;
                [ring * theta.cos(), ring * theta.sin()]
            })
            .collect();
        plot_ui.line(Line::new(circle).color(grid_color).width(0.5));
    }

    for (i, &kind) in MetricKind::ALL.iter().enumerate() {
        let theta = axis_angle(i);
        let spoke: PlotPoints = vec![[0.0, 0.0], [theta.cos(), theta.sin()]].into();
        plot_ui.line(Line::new(spoke).color(grid_color).width(0.5));

        let label_pos = PlotPoint::new(1.2 * theta.cos(), 1.2 * theta.sin());
        plot_ui.text(Text::new(label_pos, RichText::new(kind.label()).strong()));
    }
}

/// A radar chart canvas: square aspect, no cartesian chrome.
fn radar_plot(id: &str, ui: &mut Ui, content: impl FnOnce(&mut egui_plot::PlotUi)) {
    Plot::new(id.to_string())
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .height(320.0)
        .legend(Legend::default())
        .show(ui, content);
}

// ---------------------------------------------------------------------------
// Single-neighborhood radar
// ---------------------------------------------------------------------------

fn single_radar(ui: &mut Ui, dataset: &Dataset, state: &AppState) {
    ui.heading("Neighborhood radar");

    let Some(name) = state.selected_name.as_deref() else {
        ui.label("Select a neighborhood.");
        return;
    };
    let Some(record) = dataset.get(name) else {
        ui.label(format!("No data for {name}."));
        return;
    };

    match build_single(record, state.selected_year) {
        Ok(view) => {
            let color = comparison_color(0);
            radar_plot("single_radar", ui, |plot_ui| {
                radar_grid(plot_ui);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(radar_vertices(&view.normalized)))
                        .name(name)
                        .fill_color(fill_of(color))
                        .stroke(Stroke::new(1.5, color)),
                );
            });

            ui.strong("Raw values");
            for (i, &kind) in MetricKind::ALL.iter().enumerate() {
                ui.label(format!("{}: {}", kind.label(), kind.format_raw(view.raw[i])));
            }
        }
        Err(err) => {
            ui.label(RichText::new(format!("Insufficient data: {err}")).color(Color32::RED));
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison radar
// ---------------------------------------------------------------------------

fn comparison_radar(ui: &mut Ui, dataset: &Dataset, state: &AppState) {
    ui.heading(format!("Comparison – {}", state.selected_year));

    if state.comparison_names.is_empty() {
        ui.label("Select neighborhoods to compare.");
        return;
    }

    match build_comparison(dataset, state.selected_year, &state.comparison_names) {
        Ok(entries) => {
            radar_plot("comparison_radar", ui, |plot_ui| {
                radar_grid(plot_ui);
                for entry in &entries {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(radar_vertices(&entry.values)))
                            .name(&entry.name)
                            .fill_color(fill_of(entry.color))
                            .stroke(Stroke::new(1.5, entry.color)),
                    );
                }
            });
            if entries.len() < state.comparison_names.len() {
                ui.label(format!(
                    "{} of {} selected neighborhoods have complete data",
                    entries.len(),
                    state.comparison_names.len()
                ));
            }
        }
        Err(err) => {
            ui.label(RichText::new(format!("Insufficient data: {err}")).color(Color32::RED));
        }
    }
}

// ---------------------------------------------------------------------------
// Trend grid (2×2, one line plot per metric, native units)
// ---------------------------------------------------------------------------

fn trend_grid(ui: &mut Ui, dataset: &Dataset, state: &AppState) {
    let Some(name) = state.selected_name.as_deref() else {
        return;
    };
    let Some(record) = dataset.get(name) else {
        return;
    };

    ui.heading(format!("Trend – {name}"));

    let years: Vec<_> = supported_years().collect();
    let trend = match build_trend(record, &years) {
        Ok(trend) => trend,
        Err(err) => {
            ui.label(RichText::new(format!("Insufficient data: {err}")).color(Color32::RED));
            return;
        }
    };

    for row in MetricKind::ALL.chunks(2) {
        ui.columns(2, |cols: &mut [Ui]| {
            for (col, &kind) in cols.iter_mut().zip(row) {
                let Some(points) = trend.series.get(&kind) else {
                    continue;
                };
                col.strong(kind.label());
                let series: Vec<[f64; 2]> = points
                    .iter()
                    .map(|&(year, value)| [year as f64, value])
                    .collect();
                let color = comparison_color(0);
                Plot::new(format!("trend_{kind:?}"))
                    .height(180.0)
                    .y_axis_label(kind.unit())
                    .allow_scroll(false)
                    .show(col, |plot_ui| {
                        plot_ui.line(
                            Line::new(PlotPoints::from(series.clone()))
                                .color(color)
                                .width(1.5),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(series)).color(color).radius(3.0),
                        );
                    });
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Detail table (all supported years, fallback-resolved raw values)
// ---------------------------------------------------------------------------

fn detail_table(ui: &mut Ui, dataset: &Dataset, state: &AppState) {
    let Some(name) = state.selected_name.as_deref() else {
        return;
    };
    let Some(record) = dataset.get(name) else {
        return;
    };

    ui.heading(format!("Detail – {name}"));

    use egui_extras::{Column, TableBuilder};

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(60.0))
        .columns(Column::remainder(), MetricKind::ALL.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Year");
            });
            for &kind in &MetricKind::ALL {
                header.col(|ui| {
                    ui.strong(format!("{} ({})", kind.label(), kind.unit()));
                });
            }
        })
        .body(|mut body| {
            for year in supported_years() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(year.to_string());
                    });
                    for &kind in &MetricKind::ALL {
                        row.col(|ui| {
                            match extract(record, year, kind) {
                                Some(value) => ui.label(kind.format_raw(value)),
                                None => ui.label("–"),
                            };
                        });
                    }
                });
            }
        });
}
