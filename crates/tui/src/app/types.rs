use smart_analyst_backend::UploadFile;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Upload,
    Visualization,
    Chat,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Upload => Focus::Visualization,
            Focus::Visualization => Focus::Chat,
            Focus::Chat => Focus::Upload,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Upload => Focus::Chat,
            Focus::Visualization => Focus::Upload,
            Focus::Chat => Focus::Visualization,
        }
    }
}

/// Background work that owns the status line while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Reading,
    Uploading,
    Generating,
    Downloading,
    Saving,
}

/// Modal message. Blocks every other key until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    /// A precondition failed before anything was sent.
    Prompt(String),
    Notice(String),
}

impl Popup {
    pub fn text(&self) -> &str {
        match self {
            Popup::Prompt(text) | Popup::Notice(text) => text,
        }
    }
}

/// Outcomes of app-level background work (file reads, downloads).
pub enum AppAsyncEvent {
    FileLoaded {
        path: PathBuf,
        file: Option<UploadFile>,
        error: Option<String>,
    },
    ArtifactDownloaded {
        dest: Option<PathBuf>,
        error: Option<String>,
    },
    GraphsSaved {
        saved: Vec<PathBuf>,
        failed: usize,
    },
}
