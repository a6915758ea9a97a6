use super::*;

impl App {
    /// Applies whatever has finished since the last tick: controller responses
    /// first, then app-level background events.
    pub fn process_async_events(&mut self) {
        if self.upload.process_completions() > 0 && self.upload.in_flight() == 0 {
            self.finish_status(Activity::Uploading);
        }

        if self.visualization.process_completions() > 0 && self.visualization.in_flight() == 0 {
            self.finish_status(Activity::Generating);
            self.graph_scroll = 0;
        }
        if let Some(notice) = self.visualization.take_notice() {
            self.popup = Some(Popup::Notice(notice.to_string()));
        }

        self.chat.process_completions();
        self.chat_input.set(self.chat.pending_question());

        let mut async_events = Vec::new();
        if let Some(ref mut rx) = self.app_async_rx {
            while let Ok(event) = rx.try_recv() {
                async_events.push(event);
            }
        }

        for event in async_events {
            self.apply_app_event(event);
        }
    }

    pub(super) fn apply_app_event(&mut self, event: AppAsyncEvent) {
        match event {
            AppAsyncEvent::FileLoaded { path, file, error } => {
                self.finish_status(Activity::Reading);
                if let Some(err) = error {
                    self.report_error(&format!("Could not read {}", path.display()), err);
                } else if let Some(file) = file {
                    tracing::info!(path = %path.display(), size = file.len(), "Loaded file");
                    self.upload.select_file(file);
                    self.clear_error();
                }
            }
            AppAsyncEvent::ArtifactDownloaded { dest, error } => {
                if let Some(err) = error {
                    self.finish_status(Activity::Downloading);
                    self.report_error("Download failed", err);
                } else if let Some(dest) = dest {
                    self.report_status(format!("Saved {}", dest.display()));
                    self.clear_error();
                }
            }
            AppAsyncEvent::GraphsSaved { saved, failed } => {
                let dir = saved
                    .first()
                    .and_then(|p| p.parent())
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| self.downloads_dir.join("graphs").display().to_string());
                self.report_status(format!("Saved {} graph(s) to {dir}", saved.len()));
                if failed > 0 {
                    self.report_error("Saving graphs", format!("{failed} image(s) failed"));
                } else {
                    self.clear_error();
                }
            }
        }
    }
}
