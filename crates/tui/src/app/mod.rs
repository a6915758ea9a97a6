use crate::input::InputState;
use crate::keybinds::Keybinds;
use crate::ui::layout::LayoutState;
use crate::ui::panel::PanelType;
use crate::Config;
use anyhow::Result;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::Frame;
use smart_analyst_backend::{AnalystApi, AnalystBackend, ApiResult, UploadFile};
use smart_analyst_core::{
    ChatController, UploadController, ValidationError, VisualizationController,
};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

mod actions;
mod effects;
mod input;
mod render;
mod state;
mod types;

pub use state::App;
pub use types::{Activity, AppAsyncEvent, Focus, Popup};

impl App {
    pub(super) fn report_error(&mut self, context: &str, error: impl std::fmt::Display) {
        let message = format!("{context}: {error}");
        self.last_error = Some(message.clone());
        tracing::warn!("{message}");
    }

    pub(super) fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub(super) fn set_status(&mut self, activity: Activity, text: impl Into<String>) {
        self.status_line = Some(text.into());
        self.status_owner = Some(activity);
    }

    pub(super) fn report_status(&mut self, text: impl Into<String>) {
        self.status_line = Some(text.into());
        self.status_owner = None;
    }

    /// Clears the status line only if `activity` is the one that set it.
    pub(super) fn finish_status(&mut self, activity: Activity) {
        if self.status_owner == Some(activity) {
            self.status_line = None;
            self.status_owner = None;
        }
    }

    pub(super) fn show_prompt(&mut self, error: ValidationError) {
        tracing::debug!("Validation prompt: {error}");
        self.popup = Some(Popup::Prompt(error.to_string()));
    }

    pub(super) fn spawn_app_task<F>(&self, future: F)
    where
        F: Future<Output = AppAsyncEvent> + Send + 'static,
    {
        if let Some(tx) = self.app_async_tx.clone() {
            tokio::spawn(async move {
                let event = future.await;
                let _ = tx.send(event);
            });
        }
    }

    /// Waits for the next app-level background event and applies it.
    pub async fn wait_for_app_event(&mut self) -> bool {
        let event = match self.app_async_rx {
            Some(ref mut rx) => rx.recv().await,
            None => None,
        };
        match event {
            Some(event) => {
                self.apply_app_event(event);
                true
            }
            None => false,
        }
    }
}
