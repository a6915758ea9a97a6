use super::*;
use std::collections::HashSet;

pub(super) const NOTHING_TO_DOWNLOAD: &str = "No processed file yet. Upload a PDF first.";
pub(super) const NOTHING_TO_SAVE: &str = "No graphs to save yet.";

impl App {
    /// Reads the file named in the path input and selects it once loaded.
    pub(super) fn select_file_from_input(&mut self) {
        let raw = self.path_input.as_str().trim();
        if raw.is_empty() {
            self.popup = Some(Popup::Prompt("Please enter the path of a file.".to_string()));
            return;
        }

        let path = PathBuf::from(raw);
        self.set_status(Activity::Reading, format!("Reading {}...", path.display()));
        self.spawn_app_task(async move {
            match UploadFile::from_path(&path).await {
                Ok(file) => AppAsyncEvent::FileLoaded {
                    path,
                    file: Some(file),
                    error: None,
                },
                Err(e) => AppAsyncEvent::FileLoaded {
                    path,
                    file: None,
                    error: Some(e.to_string()),
                },
            }
        });
    }

    pub(super) fn start_upload(&mut self) {
        match self.upload.upload() {
            Ok(()) => self.set_status(Activity::Uploading, "Uploading..."),
            Err(e) => self.show_prompt(e),
        }
    }

    pub(super) fn start_graph_generation(&mut self) {
        self.visualization.generate_graphs();
        self.set_status(Activity::Generating, "Generating graphs...");
    }

    pub(super) fn submit_question(&mut self) {
        match self.chat.ask() {
            Ok(()) => self.chat_scroll = 0,
            Err(e) => self.show_prompt(e),
        }
    }

    pub(super) fn download_artifact(&mut self) {
        let Some(path) = self.upload.state().download_path().map(str::to_string) else {
            self.popup = Some(Popup::Notice(NOTHING_TO_DOWNLOAD.to_string()));
            return;
        };

        let api = self.api.clone();
        let dest_dir = self.downloads_dir.clone();
        self.set_status(Activity::Downloading, format!("Downloading {path}..."));
        self.spawn_app_task(async move {
            match api.download_to(&path, &dest_dir).await {
                Ok(dest) => AppAsyncEvent::ArtifactDownloaded {
                    dest: Some(dest),
                    error: None,
                },
                Err(e) => AppAsyncEvent::ArtifactDownloaded {
                    dest: None,
                    error: Some(e.to_string()),
                },
            }
        });
    }

    /// Fetches every displayed graph concurrently into `<downloads>/graphs`.
    /// Graphs whose URLs end in the same name get numbered copies.
    pub(super) fn save_graphs(&mut self) {
        let urls = self.visualization.state().image_urls().to_vec();
        if urls.is_empty() {
            self.popup = Some(Popup::Notice(NOTHING_TO_SAVE.to_string()));
            return;
        }

        let api = self.api.clone();
        let dest_dir = self.downloads_dir.join("graphs");
        let dests: Vec<PathBuf> = unique_file_names(urls.iter().map(|url| api.file_name_for(url)))
            .into_iter()
            .map(|name| dest_dir.join(name))
            .collect();
        self.set_status(Activity::Saving, format!("Saving {} graph(s)...", urls.len()));
        self.spawn_app_task(async move {
            let results = futures::future::join_all(
                urls.iter().zip(&dests).map(|(url, dest)| api.download_as(url, dest)),
            )
            .await;

            let mut saved = Vec::new();
            let mut failed = 0;
            for ((url, dest), result) in urls.iter().zip(dests).zip(results) {
                match result {
                    Ok(()) => saved.push(dest),
                    Err(e) => {
                        tracing::warn!(%url, "Failed to save graph: {e}");
                        failed += 1;
                    }
                }
            }
            AppAsyncEvent::GraphsSaved { saved, failed }
        });
    }

    pub(super) fn scroll_up(&mut self) {
        match self.focus {
            Focus::Visualization => self.graph_scroll = self.graph_scroll.saturating_sub(1),
            Focus::Chat => self.chat_scroll = self.chat_scroll.saturating_add(1),
            Focus::Upload => {}
        }
    }

    pub(super) fn scroll_down(&mut self) {
        match self.focus {
            Focus::Visualization => {
                let last = self.visualization.state().image_urls().len().saturating_sub(1);
                self.graph_scroll = (self.graph_scroll + 1).min(last);
            }
            Focus::Chat => self.chat_scroll = self.chat_scroll.saturating_sub(1),
            Focus::Upload => {}
        }
    }
}

/// Numbers repeated names as `name (2).ext`, `name (3).ext`, ... in order.
pub(super) fn unique_file_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut unique = Vec::new();
    for name in names {
        let mut candidate = name.clone();
        let mut n = 2;
        while !taken.insert(candidate.clone()) {
            candidate = match name.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
                _ => format!("{name} ({n})"),
            };
            n += 1;
        }
        unique.push(candidate);
    }
    unique
}
