use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::process::Stdio;
use std::thread;

use crate::codecs::{self, CodecCatalog};
use crate::models::{Sink, UserSelection, BEST};
use crate::session::Courier;
use crate::tool::hidden_command;

/// One yt-dlp invocation and the label its output goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub sink: Sink,
    pub format: String,
    pub url: String,
    pub output_template: String,
}

impl DownloadJob {
    pub fn args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.format.clone(),
            self.url.clone(),
            "-o".to_string(),
            self.output_template.clone(),
            "--newline".to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Line { sink: Sink, line: String },
    Finished { sink: Sink },
    Failed { sink: Sink, error: String },
}

impl DownloadEvent {
    pub fn sink(&self) -> Sink {
        match self {
            Self::Line { sink, .. } | Self::Finished { sink } | Self::Failed { sink, .. } => *sink,
        }
    }
}

/// Codec families and height after the sentinels have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChoice {
    pub video_family: String,
    pub resolution: String,
    pub audio_family: String,
}

impl ResolvedChoice {
    pub fn resolve(selection: &UserSelection, resolutions: &[String], catalog: &CodecCatalog) -> Self {
        let video_family = if selection.video_codec == BEST {
            codecs::best_video_family(catalog).to_string()
        } else {
            selection.video_codec.clone()
        };
        let audio_family = if selection.audio_codec == BEST {
            codecs::best_audio_family(catalog).to_string()
        } else {
            selection.audio_codec.clone()
        };
        let resolution = codecs::resolve_resolution(resolutions, &selection.resolution).to_string();

        Self {
            video_family,
            resolution,
            audio_family,
        }
    }
}

pub fn with_trailing_separator(dir: &str) -> String {
    if dir.ends_with(MAIN_SEPARATOR) {
        dir.to_string()
    } else {
        format!("{dir}{MAIN_SEPARATOR}")
    }
}

/// Builds the jobs for a download: one merged job, or separate video and
/// audio jobs.
pub fn plan(
    selection: &UserSelection,
    resolutions: &[String],
    catalog: &CodecCatalog,
    url: &str,
) -> Vec<DownloadJob> {
    let choice = ResolvedChoice::resolve(selection, resolutions, catalog);
    let video = format!(
        "bestvideo[{}][height={}]",
        catalog.video_fragment(&choice.video_family),
        choice.resolution
    );
    let audio = format!("bestaudio[{}]", catalog.audio_fragment(&choice.audio_family));
    let dir = with_trailing_separator(&selection.download_dir);

    let job = |sink, format: String, suffix: &str| DownloadJob {
        sink,
        format,
        url: url.to_string(),
        output_template: format!("{dir}%(title)s{suffix}.%(ext)s"),
    };

    if selection.merge {
        vec![job(Sink::Primary, format!("{video}+{audio}"), "")]
    } else {
        vec![
            job(Sink::Primary, video, " video"),
            job(Sink::Audio, audio, " audio"),
        ]
    }
}

/// Runs one job to completion, emitting its stdout line by line.
///
/// `Finished` is emitted only for a successful exit.
pub fn run_job(tool: &Path, job: &DownloadJob, mut emit: impl FnMut(DownloadEvent)) {
    let sink = job.sink;
    log::info!("starting download: {} {:?}", tool.display(), job.args());

    let mut child = match hidden_command(tool)
        .args(job.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            log::error!("failed to start {}: {}", tool.display(), e);
            emit(DownloadEvent::Failed {
                sink,
                error: e.to_string(),
            });
            return;
        }
    };

    // Drain stderr separately so a chatty tool can't block on a full pipe.
    let stderr_reader = child.stderr.take().map(|stderr| {
        thread::spawn(move || {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                log::warn!("yt-dlp: {}", line);
            }
        })
    });

    if let Some(stdout) = child.stdout.take() {
        for chunk in BufReader::new(stdout).split(b'\n') {
            match chunk {
                Ok(bytes) => {
                    let line = String::from_utf8_lossy(&bytes).trim_end_matches('\r').to_string();
                    emit(DownloadEvent::Line { sink, line });
                }
                Err(e) => {
                    log::warn!("error reading yt-dlp output: {}", e);
                    break;
                }
            }
        }
    }

    if let Some(handle) = stderr_reader {
        let _ = handle.join();
    }

    match child.wait() {
        Ok(status) if status.success() => {
            log::info!("download finished ({:?})", sink);
            emit(DownloadEvent::Finished { sink });
        }
        Ok(status) => {
            log::error!("yt-dlp exited with {} ({:?})", status, sink);
            emit(DownloadEvent::Failed {
                sink,
                error: status.to_string(),
            });
        }
        Err(e) => {
            log::error!("failed to wait for yt-dlp: {}", e);
            emit(DownloadEvent::Failed {
                sink,
                error: e.to_string(),
            });
        }
    }
}

/// Starts every job on its own thread. Returns how many were started.
pub fn start<M>(tool: PathBuf, jobs: Vec<DownloadJob>, courier: Courier<M>) -> usize
where
    M: From<DownloadEvent> + Send + 'static,
{
    let mut started = 0;
    for job in jobs {
        let tool = tool.clone();
        let courier = courier.clone();
        let spawned = thread::Builder::new()
            .name(format!("download-{:?}", job.sink).to_lowercase())
            .spawn(move || run_job(&tool, &job, |event| {
                courier.deliver(M::from(event));
            }));
        match spawned {
            Ok(_) => started += 1,
            Err(e) => log::error!("failed to spawn download thread: {}", e),
        }
    }
    started
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::classify;
    use crate::models::StreamVariant;
    use pretty_assertions::assert_eq;

    fn catalog() -> CodecCatalog {
        classify(&[
            StreamVariant {
                vcodec: "vp09.00.40.08".into(),
                height: 1080,
                ..Default::default()
            },
            StreamVariant {
                acodec: "opus".into(),
                ..Default::default()
            },
        ])
    }

    fn selection(merge: bool) -> UserSelection {
        UserSelection {
            merge,
            ..UserSelection::new(format!("{MAIN_SEPARATOR}videos"))
        }
    }

    #[test]
    fn separator_is_appended_once() {
        let dir = format!("{MAIN_SEPARATOR}videos");
        assert_eq!(with_trailing_separator(&dir), format!("{dir}{MAIN_SEPARATOR}"));
        assert_eq!(
            with_trailing_separator(&with_trailing_separator(&dir)),
            format!("{dir}{MAIN_SEPARATOR}")
        );
    }

    #[test]
    fn merged_plan_is_a_single_job() {
        let resolutions = vec!["1080".to_string(), BEST.to_string()];
        let jobs = plan(&selection(true), &resolutions, &catalog(), "https://youtu.be/x");
        assert_eq!(jobs.len(), 1);
        assert_eq!(
            jobs[0].format,
            "bestvideo[vcodec~='^vp(09|9)'][height=1080]+bestaudio[acodec*=opus]"
        );
        assert_eq!(
            jobs[0].output_template,
            format!("{MAIN_SEPARATOR}videos{MAIN_SEPARATOR}%(title)s.%(ext)s")
        );
        assert_eq!(jobs[0].args()[2], "https://youtu.be/x");
        assert_eq!(jobs[0].args().last().map(String::as_str), Some("--newline"));
    }

    #[test]
    fn split_plan_routes_audio_to_its_own_sink() {
        let resolutions = vec!["1080".to_string(), BEST.to_string()];
        let jobs = plan(&selection(false), &resolutions, &catalog(), "u");
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].sink, Sink::Primary);
        assert_eq!(jobs[0].format, "bestvideo[vcodec~='^vp(09|9)'][height=1080]");
        assert!(jobs[0].output_template.ends_with("%(title)s video.%(ext)s"));
        assert_eq!(jobs[1].sink, Sink::Audio);
        assert_eq!(jobs[1].format, "bestaudio[acodec*=opus]");
        assert!(jobs[1].output_template.ends_with("%(title)s audio.%(ext)s"));
    }

    #[test]
    fn missing_best_family_gives_empty_fragment() {
        let catalog = classify(&[StreamVariant {
            acodec: "mp4a.40.2".into(),
            ..Default::default()
        }]);
        let jobs = plan(&selection(true), &[], &catalog, "u");
        assert_eq!(jobs[0].format, "bestvideo[][height=]+bestaudio[acodec*=mp4a]");
    }

    #[test]
    fn explicit_choices_are_kept() {
        let mut selection = selection(true);
        selection.video_codec = "VP9".into();
        selection.resolution = "1080".into();
        selection.audio_codec = "OPUS".into();
        let choice = ResolvedChoice::resolve(&selection, &[], &catalog());
        assert_eq!(
            choice,
            ResolvedChoice {
                video_family: "VP9".into(),
                resolution: "1080".into(),
                audio_family: "OPUS".into(),
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn echo_output_is_forwarded_then_finished() {
        let job = DownloadJob {
            sink: Sink::Audio,
            format: "bestaudio[acodec*=opus]".into(),
            url: "https://youtu.be/x".into(),
            output_template: "/tmp/%(title)s audio.%(ext)s".into(),
        };
        let mut events = Vec::new();
        run_job(Path::new("echo"), &job, |event| events.push(event));

        assert_eq!(
            events,
            vec![
                DownloadEvent::Line {
                    sink: Sink::Audio,
                    line: "-f bestaudio[acodec*=opus] https://youtu.be/x -o /tmp/%(title)s audio.%(ext)s --newline"
                        .into(),
                },
                DownloadEvent::Finished { sink: Sink::Audio },
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_never_reports_finished() {
        let job = plan(&selection(true), &[], &catalog(), "u").remove(0);
        let mut events = Vec::new();
        run_job(Path::new("false"), &job, |event| events.push(event));
        assert!(matches!(events.as_slice(), [DownloadEvent::Failed { sink: Sink::Primary, .. }]));
    }

    #[test]
    fn spawn_failure_is_reported() {
        let job = plan(&selection(true), &[], &catalog(), "u").remove(0);
        let mut events = Vec::new();
        run_job(Path::new("/no/such/yt-dlp"), &job, |event| events.push(event));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DownloadEvent::Failed { .. }));
    }

    #[test]
    fn start_delivers_through_courier() {
        let (courier, rx) = Courier::<DownloadEvent>::channel(None);
        let jobs = plan(&selection(false), &[], &catalog(), "u");
        assert_eq!(start(PathBuf::from("/no/such/yt-dlp"), jobs, courier), 2);

        let mut sinks: Vec<Sink> = rx.iter().map(|event| event.sink()).collect();
        sinks.sort_by_key(|sink| *sink == Sink::Audio);
        assert_eq!(sinks, vec![Sink::Primary, Sink::Audio]);
    }
}
