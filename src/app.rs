//! Window layout and per-frame event handling

use std::time::Duration;

use eframe::{egui, App, Frame};
use egui::{Align2, Color32, RichText, Visuals};
use rfd::FileDialog;

use crate::{
    downloader::Extractor,
    model::DialogLevel,
    session::Session,
};

const BACKGROUND: Color32 = Color32::from_rgb(0x1e, 0x1e, 0x2f);
const FIELD: Color32 = Color32::from_rgb(0x2c, 0x2c, 0x3c);
const ACCENT: Color32 = Color32::from_rgb(0x6b, 0x5b, 0xff);
const ACCENT_HOVER: Color32 = Color32::from_rgb(0x8c, 0x7a, 0xff);

/// Dark theme with the purple accent used for buttons and the progress bar
pub fn visuals() -> Visuals {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.extreme_bg_color = FIELD;
    visuals.selection.bg_fill = ACCENT;
    visuals.widgets.inactive.weak_bg_fill = ACCENT;
    visuals.widgets.hovered.weak_bg_fill = ACCENT_HOVER;
    visuals.widgets.active.weak_bg_fill = ACCENT_HOVER;
    visuals
}

/// Application state for the GUI
pub struct DownloaderApp<E: Extractor> {
    session: Session<E>,
}

impl<E: Extractor> DownloaderApp<E> {
    pub fn new(session: Session<E>) -> Self {
        Self { session }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.session.current_dialog() else {
            return;
        };
        let text = match dialog.level {
            DialogLevel::Info => RichText::new(&dialog.message),
            DialogLevel::Error => RichText::new(&dialog.message).color(Color32::LIGHT_RED),
        };
        let mut dismissed = false;
        egui::Window::new(dialog.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(text);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.session.dismiss_dialog();
        }
    }
}

impl<E: Extractor> App for DownloaderApp<E> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Apply worker notifications before drawing
        self.session.pump();

        let modal_open = self.session.current_dialog().is_some();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                ui.label("Enter SoundCloud song URL:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.session.url_input)
                        .hint_text("https://soundcloud.com/...")
                        .desired_width(f32::INFINITY),
                );

                ui.label("Save to folder:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.session.folder_input)
                        .desired_width(f32::INFINITY),
                );
                if ui.button("Browse").clicked() {
                    if let Some(folder) = FileDialog::new()
                        .set_title("Select Download Folder")
                        .set_directory(self.session.folder_input.trim())
                        .pick_folder()
                    {
                        self.session.folder_input = folder.display().to_string();
                    }
                }

                let progress = f32::from(self.session.progress()) / 100.0;
                ui.add(egui::ProgressBar::new(progress).show_percentage());

                let trigger = egui::Button::new(RichText::new("Download 🎶").strong());
                if ui.add_enabled(self.session.trigger_enabled(), trigger).clicked() {
                    self.session.start_download();
                }
            });
        });

        self.show_dialog(ctx);

        // Keep polling while a job is in flight
        if !self.session.trigger_enabled() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
