use std::path::PathBuf;
use std::time::Instant;

use egui::{Color32, Direction, Layout, RichText, Ui, Vec2b, Visuals, style::Widgets};
use egui_plot::{Line, LineStyle, PlotPoint, PlotPoints, Points, Text, VLine};
use log::{error, info};

use super::config::AppConfig;
use super::{
    BRAKE_COLOR, CAR_DOT_RADIUS, CORNER_COLOR, MARKER_RADIUS, PALETTE_BLACK, RATE_OPTIONS,
    SPEED_COLOR, THROTTLE_COLOR, TRACK_COLOR,
};
use crate::playback::{
    PlaybackController, PlaybackMode, SharedFrame, TickScheduler, TickToken,
};
use crate::trace::loader::load_trace_json;

/// Maps the controller's tick requests onto egui repaints. The token is
/// carried by the controller itself; a repaint is just "call me next
/// frame".
pub(crate) struct RepaintScheduler {
    ctx: egui::Context,
}

impl TickScheduler for RepaintScheduler {
    fn request_tick(&mut self, _token: TickToken) {
        self.ctx.request_repaint();
    }
}

/// `LapViewerApp` replays one lap of telemetry: a car dot runs around the
/// track map while markers track the speed, throttle, and brake charts,
/// all fed the same interpolated frame each tick.
pub struct LapViewerApp {
    controller: PlaybackController<RepaintScheduler>,
    // one render surface per chart; RenderSync keeps them consistent
    map_marker: SharedFrame,
    speed_marker: SharedFrame,
    throttle_marker: SharedFrame,
    brake_marker: SharedFrame,
    app_config: AppConfig,
    epoch: Instant,
    loaded_file: Option<PathBuf>,
    load_error: Option<String>,
}

impl LapViewerApp {
    pub fn new(input: Option<&PathBuf>, cc: &eframe::CreationContext<'_>) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            panel_fill: PALETTE_BLACK,
            faint_bg_color: PALETTE_BLACK,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        let app_config = AppConfig::from_local_file().unwrap_or_default();

        let mut controller = PlaybackController::new(RepaintScheduler {
            ctx: cc.egui_ctx.clone(),
        });
        let map_marker = SharedFrame::new();
        let speed_marker = SharedFrame::new();
        let throttle_marker = SharedFrame::new();
        let brake_marker = SharedFrame::new();
        controller
            .render_sync_mut()
            .attach(Box::new(map_marker.clone()));
        controller
            .render_sync_mut()
            .attach(Box::new(speed_marker.clone()));
        controller
            .render_sync_mut()
            .attach(Box::new(throttle_marker.clone()));
        controller
            .render_sync_mut()
            .attach(Box::new(brake_marker.clone()));
        controller.set_rate(app_config.playback_rate, 0.);

        let mut app = Self {
            controller,
            map_marker,
            speed_marker,
            throttle_marker,
            brake_marker,
            app_config,
            epoch: Instant::now(),
            loaded_file: None,
            load_error: None,
        };
        if let Some(path) = input {
            app.load_trace_file(path.clone());
        }
        app
    }

    fn load_trace_file(&mut self, path: PathBuf) {
        match load_trace_json(&path) {
            Ok(trace) => {
                info!("Viewing {:?}", path);
                self.controller.load(trace);
                self.load_error = None;
                self.loaded_file = Some(path.clone());
                self.app_config.last_trace_file = Some(path);
            }
            Err(e) => {
                error!("Could not load telemetry trace: {}", e);
                self.load_error = Some(format!("{}", e));
            }
        }
    }

    fn show_transport_controls(&mut self, ui: &mut Ui, now_s: f64) {
        ui.with_layout(Layout::left_to_right(egui::Align::Center), |ui| {
            if ui.button("📂 Load Lap").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("telemetry", &["json"])
                    .pick_file()
            {
                self.load_trace_file(path);
            }
            ui.separator();

            let play_label = match self.controller.mode() {
                PlaybackMode::Playing => "⏸ Pause",
                PlaybackMode::Paused | PlaybackMode::Idle => "▶ Play",
            };
            if ui.button(play_label).clicked() {
                match self.controller.mode() {
                    PlaybackMode::Playing => self.controller.pause(),
                    _ => self.controller.play(now_s),
                }
            }

            ui.label(RichText::new("Rate: ").color(Color32::WHITE));
            let mut rate = self.controller.rate();
            egui::ComboBox::from_id_salt("rate_selector")
                .selected_text(format!("{}x", rate))
                .show_ui(ui, |ui| {
                    for option in RATE_OPTIONS {
                        ui.selectable_value(&mut rate, option, format!("{}x", option));
                    }
                });
            if rate != self.controller.rate() {
                self.controller.set_rate(rate, now_s);
                self.app_config.playback_rate = rate;
            }

            if !self.controller.trace().is_empty() {
                ui.separator();
                let last_index = self.controller.trace().last_index();
                let mut scrub_index = self.controller.cursor();
                let slider = ui.add(
                    egui::Slider::new(&mut scrub_index, 0..=last_index)
                        .show_value(false)
                        .text("lap position"),
                );
                if slider.changed() {
                    self.controller.scrub(scrub_index);
                }
            }

            if let Some(ref error) = self.load_error {
                ui.separator();
                ui.label(RichText::new(error).color(Color32::RED));
            } else if let Some(ref path) = self.loaded_file {
                ui.separator();
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                ui.label(RichText::new(name).color(Color32::GRAY));
            }
        });
    }

    fn show_speed_chart(&self, ui: &mut Ui, height: f32) {
        let trace = self.controller.trace().clone();
        let speed_line: Vec<[f64; 2]> = trace
            .samples()
            .iter()
            .map(|s| [s.distance_m, s.speed_kmh])
            .collect();

        egui_plot::Plot::new("speed_chart")
            .height(height)
            .include_x(0.)
            .include_x(trace.max_distance_m())
            .include_y(0.)
            .include_y(360.)
            .auto_bounds(Vec2b::new(false, false))
            .show_background(false)
            .show(ui, |plot_ui| {
                for corner in trace.corners() {
                    plot_ui.vline(
                        VLine::new("", corner.distance_m)
                            .color(CORNER_COLOR)
                            .style(LineStyle::dashed_loose()),
                    );
                    plot_ui.text(Text::new(
                        "",
                        PlotPoint::new(corner.distance_m, 10.),
                        RichText::new(corner.number.to_string()).strong(),
                    ));
                }

                plot_ui.line(
                    Line::new("Speed", PlotPoints::new(speed_line))
                        .color(SPEED_COLOR)
                        .width(2.),
                );
                if let Some(frame) = self.speed_marker.get() {
                    plot_ui.points(
                        Points::new("", vec![[frame.distance_m, frame.speed_kmh]])
                            .color(SPEED_COLOR)
                            .radius(MARKER_RADIUS),
                    );
                }
            });
    }

    fn show_channel_strip(
        &self,
        ui: &mut Ui,
        plot_id: &str,
        label: &str,
        color: Color32,
        max_y: f64,
        values: Vec<[f64; 2]>,
        marker: Option<[f64; 2]>,
    ) {
        ui.label(RichText::new(label).color(Color32::GRAY).small());
        egui_plot::Plot::new(plot_id)
            .include_x(0.)
            .include_x(self.controller.trace().max_distance_m())
            .include_y(0.)
            .include_y(max_y)
            .auto_bounds(Vec2b::new(false, false))
            .show_background(false)
            .show_grid(false)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(label, PlotPoints::new(values))
                        .color(color)
                        .fill(0.),
                );
                if let Some(position) = marker {
                    plot_ui.points(
                        Points::new("", vec![position])
                            .color(color)
                            .radius(MARKER_RADIUS),
                    );
                }
            });
    }

    fn show_track_map(&self, ui: &mut Ui) {
        let trace = self.controller.trace().clone();
        let bounds = trace.bounds();

        egui_plot::Plot::new("track_map")
            .include_x(bounds.min_x)
            .include_x(bounds.max_x)
            .include_y(bounds.min_y)
            .include_y(bounds.max_y)
            .data_aspect(1.)
            .auto_bounds(Vec2b::new(false, false))
            .show_background(false)
            .show_grid(false)
            .show_axes(Vec2b::new(false, false))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("", PlotPoints::new(trace.path().to_vec()))
                        .color(TRACK_COLOR)
                        .width(3.),
                );
                for corner in trace.corners() {
                    plot_ui.points(
                        Points::new("", vec![[corner.x, corner.y]])
                            .color(CORNER_COLOR)
                            .radius(CAR_DOT_RADIUS),
                    );
                    plot_ui.text(Text::new(
                        "",
                        PlotPoint::new(corner.x, corner.y),
                        RichText::new(corner.number.to_string())
                            .color(Color32::WHITE)
                            .strong(),
                    ));
                }
                if let Some(frame) = self.map_marker.get() {
                    plot_ui.points(
                        Points::new("Car", vec![[frame.x, frame.y]])
                            .color(SPEED_COLOR)
                            .radius(CAR_DOT_RADIUS),
                    );
                }
            });
    }
}

impl eframe::App for LapViewerApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now_s = self.epoch.elapsed().as_secs_f64();

        // deliver the frame callback the controller asked for
        if let Some(token) = self.controller.pending_tick() {
            self.controller.on_tick(token, now_s);
        }

        egui::TopBottomPanel::top("transport")
            .min_height(36.)
            .show(ctx, |ui| {
                self.show_transport_controls(ui, now_s);
            });

        if self.controller.trace().is_empty() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.with_layout(Layout::centered_and_justified(Direction::TopDown), |ui| {
                    ui.label(
                        RichText::new("No telemetry loaded")
                            .color(Color32::WHITE)
                            .strong(),
                    );
                });
            });
            return;
        }

        egui::SidePanel::right("track_map_panel")
            .resizable(true)
            .default_width(ctx.available_rect().width() * 0.45)
            .show(ctx, |ui| {
                ui.label(RichText::new("Track Map").color(Color32::GRAY).small());
                self.show_track_map(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let strip_height = ui.available_height() * 0.25;
            let speed_height = ui.available_height() - strip_height - 40.;
            ui.label(RichText::new("Speed (km/h)").color(Color32::GRAY).small());
            self.show_speed_chart(ui, speed_height);

            let trace = self.controller.trace().clone();
            ui.columns(2, |columns| {
                let throttle: Vec<[f64; 2]> = trace
                    .samples()
                    .iter()
                    .map(|s| [s.distance_m, s.throttle_pct])
                    .collect();
                self.show_channel_strip(
                    &mut columns[0],
                    "throttle_chart",
                    "Throttle %",
                    THROTTLE_COLOR,
                    110.,
                    throttle,
                    self.throttle_marker
                        .get()
                        .map(|f| [f.distance_m, f.throttle_pct]),
                );

                let brake: Vec<[f64; 2]> = trace
                    .samples()
                    .iter()
                    .map(|s| [s.distance_m, s.brake])
                    .collect();
                let brake_ceiling = trace
                    .samples()
                    .iter()
                    .map(|s| s.brake)
                    .fold(1., f64::max)
                    * 1.2;
                self.show_channel_strip(
                    &mut columns[1],
                    "brake_chart",
                    "Brake",
                    BRAKE_COLOR,
                    brake_ceiling,
                    brake,
                    self.brake_marker.get().map(|f| [f.distance_m, f.brake]),
                );
            });
        });
    }
}
