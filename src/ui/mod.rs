use eframe::egui;
use rfd::FileDialog;
use std::path::Path;

use crate::localizations::Localizations;
use crate::models::{AppState, UserSelection, BEST};
use crate::theme::*;

fn option_label(option: &str, localizer: &Localizations) -> String {
    if option == BEST {
        localizer.text("best-option")
    } else {
        option.to_string()
    }
}

/// A combo box over `options`. Returns true when the selection changed.
fn option_combo(
    ui: &mut egui::Ui,
    id: &str,
    selected: &mut String,
    options: &[String],
    localizer: &Localizations,
) -> bool {
    let before = selected.clone();
    egui::ComboBox::from_id_source(id)
        .width(ui.available_width())
        .selected_text(option_label(selected, localizer))
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(selected, option.clone(), option_label(option, localizer));
            }
        });
    *selected != before
}

fn wrapped_label(ui: &mut egui::Ui, text: impl Into<egui::WidgetText>) {
    ui.add(egui::Label::new(text).wrap(true));
}

/// URL field plus the "Get Video" button. Returns true when a lookup was
/// requested by button or Enter.
pub fn render_url_input(ui: &mut egui::Ui, state: &mut AppState, localizer: &Localizations) -> bool {
    let enabled = !state.is_fetching;
    let mut submitted = false;

    ui.columns(2, |columns| {
        let response = columns[0].add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut state.url)
                .hint_text(localizer.text("url-placeholder"))
                .desired_width(f32::INFINITY),
        );
        if response.lost_focus() && columns[0].input(|i| i.key_pressed(egui::Key::Enter)) {
            submitted = true;
        }

        let button = egui::Button::new(
            egui::RichText::new(localizer.text("get-video"))
                .size(BUTTON_FONT_SIZE)
                .color(BUTTON_MAIN_TEXT),
        )
        .min_size(egui::vec2(columns[1].available_width(), MIN_SIZE_BUTTON.y))
        .fill(PRIMARY_BUTTON_BG)
        .rounding(ROUNDING_BUTTON)
        .stroke(egui::Stroke::new(1.0, BORDER_COLOR));

        if columns[1].add_enabled(enabled, button).clicked() {
            submitted = true;
        }
    });

    submitted && enabled
}

pub fn render_preview(
    ui: &mut egui::Ui,
    thumbnail: Option<&egui::TextureHandle>,
    title: &str,
    localizer: &Localizations,
) {
    ui.vertical(|ui| {
        match thumbnail {
            Some(texture) => {
                let size = texture.size_vec2();
                let scale = (THUMBNAIL_HEIGHT / size.y).min(ui.available_width() / size.x);
                ui.image((texture.id(), size * scale));
            }
            None => {
                ui.allocate_ui(egui::vec2(ui.available_width(), THUMBNAIL_HEIGHT), |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(SECONDARY_TEXT, localizer.text("no-thumbnail"));
                    });
                });
            }
        }
        wrapped_label(ui, egui::RichText::new(title).strong());
    });
}

/// Video codec and resolution selectors. Returns true when the codec changed
/// and the resolution list must be rebuilt.
pub fn render_video_options(
    ui: &mut egui::Ui,
    selection: &mut UserSelection,
    codec_options: &[String],
    resolution_options: &[String],
    localizer: &Localizations,
) -> bool {
    let mut codec_changed = false;
    ui.vertical(|ui| {
        wrapped_label(ui, egui::RichText::new(localizer.text("video-settings")).strong());
        wrapped_label(ui, localizer.text("codec"));
        codec_changed = option_combo(
            ui,
            "video-codec",
            &mut selection.video_codec,
            codec_options,
            localizer,
        );
        wrapped_label(ui, localizer.text("resolution"));
        option_combo(
            ui,
            "resolution",
            &mut selection.resolution,
            resolution_options,
            localizer,
        );
    });
    codec_changed
}

pub fn render_audio_options(
    ui: &mut egui::Ui,
    selection: &mut UserSelection,
    codec_options: &[String],
    localizer: &Localizations,
) {
    ui.vertical(|ui| {
        wrapped_label(ui, egui::RichText::new(localizer.text("audio-settings")).strong());
        wrapped_label(ui, localizer.text("codec"));
        option_combo(
            ui,
            "audio-codec",
            &mut selection.audio_codec,
            codec_options,
            localizer,
        );
    });
}

pub fn render_download_dir_selector(ui: &mut egui::Ui, selection: &mut UserSelection, localizer: &Localizations) {
    wrapped_label(ui, localizer.text("download-folder"));

    ui.horizontal(|ui| {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(ROUNDING_FRAME)
            .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
            .show(ui, |ui| {
                ui.add_sized(
                    [ui.available_width() - MIN_SIZE_BUTTON.x, MIN_SIZE_BUTTON.y],
                    egui::TextEdit::singleline(&mut selection.download_dir)
                        .frame(false)
                        .margin(egui::vec2(6.0, 6.0)),
                );
            });

        let button = egui::Button::new(egui::RichText::new(localizer.text("browse-button")).size(14.0))
            .min_size(egui::vec2(ui.available_width(), MIN_SIZE_BUTTON.y))
            .fill(ui.visuals().widgets.inactive.bg_fill)
            .rounding(ROUNDING_FRAME);

        if ui.add(button).clicked() {
            let start = Path::new(&selection.download_dir);
            let start = if start.is_dir() {
                start
            } else {
                start.parent().unwrap_or_else(|| Path::new("."))
            };
            if let Some(path) = FileDialog::new().set_directory(start).pick_folder() {
                selection.download_dir = path.to_string_lossy().to_string();
            }
        }
    });
}

/// Merge toggle and download button. Returns true when a download was
/// requested.
pub fn render_download_controls(
    ui: &mut egui::Ui,
    selection: &mut UserSelection,
    enabled: bool,
    localizer: &Localizations,
) -> bool {
    let mut clicked = false;
    ui.columns(2, |columns| {
        columns[0].checkbox(&mut selection.merge, localizer.text("merge"));

        let button = egui::Button::new(
            egui::RichText::new(localizer.text("download-button"))
                .size(BUTTON_FONT_SIZE)
                .color(BUTTON_MAIN_TEXT),
        )
        .min_size(egui::vec2(columns[1].available_width(), MIN_SIZE_BUTTON.y))
        .fill(PRIMARY_BUTTON_BG)
        .rounding(ROUNDING_BUTTON)
        .stroke(egui::Stroke::new(1.0, BORDER_COLOR));

        clicked = columns[1].add_enabled(enabled, button).clicked();
    });
    clicked
}

pub fn render_status(ui: &mut egui::Ui, state: &AppState, localizer: &Localizations) {
    if !(state.is_fetching || state.show_progress || state.show_audio_progress) {
        return;
    }

    egui::Frame::group(ui.style())
        .fill(PANEL_BG)
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            if state.is_fetching {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.colored_label(SECONDARY_TEXT, localizer.text("loading"));
                });
            }
            if state.show_progress {
                wrapped_label(ui, egui::RichText::new(&state.progress).monospace());
            }
            if state.show_audio_progress {
                wrapped_label(ui, egui::RichText::new(&state.audio_progress).monospace());
            }
        });
}
