use super::state::Phase;
use super::BylawUploader;
use crate::upload::ArtifactKind;
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;

const SUCCESS_GREEN: Color32 = Color32::from_rgb(0, 180, 0);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);

impl BylawUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Bylaw Parser");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Upload a PDF to extract and translate sections")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_drop_zone(ui);
                ui.add_space(10.0);
                self.render_actions(ui);
                ui.add_space(10.0);
                self.render_status(ui);
                ui.add_space(20.0);
            });
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let selection = self
            .state
            .selected_file()
            .map(|file| format!("📄 {} ({})", file.name, file.display_size()));
        let placeholder = if self.state.is_dragging {
            "Drop PDF file here"
        } else {
            "Drag & drop a PDF file or choose one below"
        };

        ui.group(|ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                match &selection {
                    Some(text) => {
                        ui.label(text);
                    }
                    None => {
                        ui.label(
                            RichText::new(placeholder)
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    }
                }

                ui.add_space(8.0);
                ui.add_enabled_ui(!self.state.is_uploading(), |ui| {
                    if ui.button("📂 Choose PDF").clicked() {
                        if let Some(path) = FileDialog::new()
                            .add_filter("PDF documents", &["pdf"])
                            .pick_file()
                        {
                            self.select_path(&path);
                        }
                    }
                });
                ui.add_space(12.0);
            });
        });
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        if !self.state.can_submit() {
            return;
        }

        ui.vertical_centered(|ui| {
            let button = egui::Button::new("📤 Process PDF").min_size(egui::vec2(200.0, 40.0));
            if ui.add(button).clicked() {
                self.start_upload();
            }
        });
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = self.state.loading_message() {
            ui.vertical_centered(|ui| {
                ui.add(egui::Spinner::new().size(28.0));
                ui.add_space(8.0);
                ui.label(message);
            });
        }

        let error = self.state.error_message().map(str::to_owned);
        if let Some(error) = error {
            ui.vertical_centered(|ui| {
                ui.colored_label(ERROR_RED, format!("⚠ {error}"));
            });
        }

        let stats = match self.state.phase() {
            Phase::Succeeded { outcome, .. } => Some(outcome.stats_line()),
            _ => None,
        };
        if let Some(stats) = stats {
            ui.vertical_centered(|ui| {
                ui.colored_label(SUCCESS_GREEN, "✓ Processing complete!");
                ui.label(stats);

                ui.add_space(10.0);
                if ui.button("📥 Download Extracted Sections").clicked() {
                    self.download(ArtifactKind::Extracted);
                }
                ui.add_space(4.0);
                if ui.button("📥 Download Translated Sections").clicked() {
                    self.download(ArtifactKind::Translated);
                }

                ui.add_space(10.0);
                if ui.button("Upload Another File").clicked() {
                    self.reset();
                }
            });
        }
    }
}
