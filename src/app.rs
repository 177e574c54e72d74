use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use eframe::egui;

use crate::codecs;
use crate::config::Settings;
use crate::download::{self, DownloadEvent};
use crate::errors::AppError;
use crate::localizations::Localizations;
use crate::metadata::{self, FetchedVideo, Thumbnail};
use crate::models::{AppState, Sink, UserSelection, BEST};
use crate::session::{spawn_task, Courier, Session, Snapshot};
use crate::tool;
use crate::ui;

/// Results handed back to the UI thread.
#[derive(Debug)]
pub enum AppMessage {
    Fetched {
        generation: u64,
        result: Result<FetchedVideo, AppError>,
    },
    Download(DownloadEvent),
}

impl From<DownloadEvent> for AppMessage {
    fn from(event: DownloadEvent) -> Self {
        Self::Download(event)
    }
}

pub struct YtdlApp {
    pub state: AppState,
    settings: Settings,
    localizer: Localizations,
    session: Session,
    tool: Option<PathBuf>,
    thumbnail: Option<egui::TextureHandle>,
    courier: Courier<AppMessage>,
    inbox: Receiver<AppMessage>,
}

impl YtdlApp {
    pub fn new(ctx: &egui::Context, settings: Settings) -> Self {
        let (courier, inbox) = Courier::channel(Some(ctx.clone()));
        let localizer = Localizations::new(settings.language.as_deref());

        let tool = match tool::find_ytdlp(settings.ytdlp_path.as_deref()) {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("{}", e);
                None
            }
        };

        Self {
            state: AppState::default(),
            settings,
            localizer,
            session: Session::new(),
            tool,
            thumbnail: None,
            courier,
            inbox,
        }
    }

    pub fn fetch(&mut self) {
        if self.state.is_fetching {
            return;
        }
        let Some(tool) = self.tool.clone() else {
            log::warn!("lookup skipped: yt-dlp is not available");
            return;
        };

        self.state.reset_progress();
        self.state.is_fetching = true;

        let generation = self.session.begin_fetch();
        let url = self.state.url.trim().to_string();
        let spawned = spawn_task("metadata-fetch", self.courier.clone(), move || {
            AppMessage::Fetched {
                generation,
                result: metadata::fetch_video(&tool, &url),
            }
        });
        if let Err(e) = spawned {
            log::error!("failed to start lookup: {}", e);
            self.state.is_fetching = false;
        }
    }

    pub fn start_download(&mut self) {
        if self.state.is_downloading() {
            return;
        }
        let (Some(tool), Some(snapshot), Some(selection)) = (
            self.tool.clone(),
            self.session.current(),
            self.state.selection.as_mut(),
        ) else {
            return;
        };

        selection.download_dir = download::with_trailing_separator(&selection.download_dir);
        let jobs = download::plan(
            selection,
            &self.state.resolution_options,
            &snapshot.catalog,
            &snapshot.video.webpage_url,
        );

        self.state.show_progress = true;
        self.state.show_audio_progress = !selection.merge;
        self.state.active_streams = download::start(tool, jobs, self.courier.clone());
    }

    fn process_messages(&mut self, ctx: &egui::Context) {
        while let Ok(message) = self.inbox.try_recv() {
            match message {
                AppMessage::Fetched { generation, result } => {
                    self.on_fetched(ctx, generation, result)
                }
                AppMessage::Download(event) => self.on_download_event(event),
            }
        }
    }

    fn on_fetched(
        &mut self,
        ctx: &egui::Context,
        generation: u64,
        result: Result<FetchedVideo, AppError>,
    ) {
        if !self.session.is_current(generation) {
            return;
        }
        self.state.is_fetching = false;

        let fetched = match result {
            Ok(fetched) => fetched,
            Err(e) => {
                log::error!("lookup failed: {}", e);
                return;
            }
        };

        let FetchedVideo {
            video,
            catalog,
            thumbnail,
        } = fetched;
        let Some(snapshot) = self.session.accept(generation, Snapshot { video, catalog }) else {
            return;
        };

        let download_dir = self
            .state
            .selection
            .as_ref()
            .map(|selection| selection.download_dir.clone())
            .unwrap_or_else(|| self.settings.download_dir.to_string_lossy().to_string());
        self.state.selection = Some(UserSelection::new(download_dir));
        self.state.resolution_options = codecs::resolutions_for(BEST, &snapshot.catalog);
        self.thumbnail = thumbnail.map(|thumbnail| load_thumbnail(ctx, thumbnail));
    }

    fn on_download_event(&mut self, event: DownloadEvent) {
        match event {
            DownloadEvent::Line { sink, line } => *self.state.sink_text(sink) = line,
            DownloadEvent::Finished { sink } => {
                *self.state.sink_text(sink) = self.localizer.text("download-finished");
                self.stream_ended(sink);
            }
            DownloadEvent::Failed { sink, error } => {
                log::error!("download failed ({:?}): {}", sink, error);
                self.stream_ended(sink);
            }
        }
    }

    fn stream_ended(&mut self, sink: Sink) {
        self.state.active_streams = self.state.active_streams.saturating_sub(1);
        log::debug!("{:?} stream ended, {} still running", sink, self.state.active_streams);
    }

    pub fn update_ui(&mut self, ctx: &egui::Context) {
        self.process_messages(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if ui::render_url_input(ui, &mut self.state, &self.localizer) {
                    self.fetch();
                }
                ui.add_space(10.0);

                if let Some(snapshot) = self.session.current() {
                    self.render_video(ui, &snapshot);
                    ui.add_space(10.0);
                }

                ui::render_status(ui, &self.state, &self.localizer);
            });
        });
    }

    fn render_video(&mut self, ui: &mut egui::Ui, snapshot: &Arc<Snapshot>) {
        let mut download_clicked = false;
        let download_enabled = !self.state.is_downloading();
        let video_options = snapshot.catalog.video_options();
        let audio_options = snapshot.catalog.audio_options();

        ui.columns(2, |columns| {
            ui::render_preview(
                &mut columns[0],
                self.thumbnail.as_ref(),
                &snapshot.video.fulltitle,
                &self.localizer,
            );

            let Some(selection) = self.state.selection.as_mut() else {
                return;
            };
            let options = &mut columns[1];
            options.columns(2, |halves| {
                if ui::render_video_options(
                    &mut halves[0],
                    selection,
                    &video_options,
                    &self.state.resolution_options,
                    &self.localizer,
                ) {
                    self.state.resolution_options =
                        codecs::resolutions_for(&selection.video_codec, &snapshot.catalog);
                    selection.resolution = self
                        .state
                        .resolution_options
                        .last()
                        .cloned()
                        .unwrap_or_else(|| BEST.to_string());
                }
                ui::render_audio_options(&mut halves[1], selection, &audio_options, &self.localizer);
            });
            options.add_space(10.0);
            ui::render_download_dir_selector(options, selection, &self.localizer);
            options.add_space(10.0);
            download_clicked =
                ui::render_download_controls(options, selection, download_enabled, &self.localizer);
        });

        if download_clicked {
            self.start_download();
        }
    }
}

fn load_thumbnail(ctx: &egui::Context, thumbnail: Thumbnail) -> egui::TextureHandle {
    let image = egui::ColorImage::from_rgba_unmultiplied(thumbnail.size, &thumbnail.rgba);
    ctx.load_texture("thumbnail", image, egui::TextureOptions::LINEAR)
}

impl eframe::App for YtdlApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_ui(ctx);
    }
}
