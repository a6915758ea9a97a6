use crate::completion::{Completion, Completions, ResponseOrdering};
use crate::error::ValidationError;
use smart_analyst_backend::{AnalystBackend, ApiResult, UploadFile, UploadResponse};
use std::sync::Arc;

pub const UPLOAD_FAILED_MESSAGE: &str = "File upload failed.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    selected_file: Option<UploadFile>,
    status_message: String,
    download_path: Option<String>,
}

impl UploadState {
    pub fn selected_file(&self) -> Option<&UploadFile> {
        self.selected_file.as_ref()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Server-relative path of the processed artifact, once an upload has succeeded.
    pub fn download_path(&self) -> Option<&str> {
        self.download_path.as_deref()
    }
}

/// Owns file selection and the upload-then-download workflow.
pub struct UploadController {
    state: UploadState,
    backend: Arc<dyn AnalystBackend>,
    completions: Completions<ApiResult<UploadResponse>>,
}

impl UploadController {
    pub fn new(backend: Arc<dyn AnalystBackend>) -> Self {
        Self {
            state: UploadState::default(),
            backend,
            completions: Completions::new(ResponseOrdering::default()),
        }
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.completions.set_ordering(ordering);
        self
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn select_file(&mut self, file: UploadFile) {
        tracing::debug!(name = %file.file_name, size = file.len(), "File selected");
        self.state.selected_file = Some(file);
    }

    /// Sends the selected file. Each call issues its own request, even while
    /// earlier ones are still pending.
    pub fn upload(&mut self) -> Result<(), ValidationError> {
        let file = self
            .state
            .selected_file
            .clone()
            .ok_or(ValidationError::NoFileSelected)?;

        let backend = Arc::clone(&self.backend);
        let name = file.file_name.clone();
        let seq = self
            .completions
            .spawn(async move { backend.upload(file).await });
        tracing::info!(seq, %name, "Upload issued");
        Ok(())
    }

    pub fn in_flight(&self) -> usize {
        self.completions.in_flight()
    }

    /// Applies every response that has already arrived. Returns how many were handled.
    pub fn process_completions(&mut self) -> usize {
        let mut handled = 0;
        while let Some(completion) = self.completions.try_next() {
            self.apply(completion);
            handled += 1;
        }
        handled
    }

    /// Waits for the next response and applies it. Returns `false` when nothing
    /// is in flight.
    pub async fn wait_for_completion(&mut self) -> bool {
        match self.completions.next().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, completion: Completion<ApiResult<UploadResponse>>) {
        let Completion { seq, outcome } = completion;
        if !self.completions.admit(seq) {
            tracing::debug!(seq, "Dropping stale upload response");
            return;
        }

        match outcome {
            Ok(response) => {
                tracing::info!(seq, download = %response.download_url, "Upload processed");
                self.state.status_message = response.message;
                self.state.download_path = Some(response.download_url);
            }
            Err(e) => {
                tracing::warn!(seq, kind = e.kind(), "Upload failed: {e}");
                self.state.status_message = UPLOAD_FAILED_MESSAGE.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{server_error, uploaded, ScriptedBackend};

    fn pdf(name: &str) -> UploadFile {
        UploadFile::new(name, b"%PDF-1.7".to_vec())
    }

    #[tokio::test]
    async fn upload_without_selection_issues_nothing() {
        let backend = Arc::new(ScriptedBackend::default());
        let mut controller = UploadController::new(backend.clone());

        assert_eq!(controller.upload(), Err(ValidationError::NoFileSelected));
        assert_eq!(controller.in_flight(), 0);
        assert!(!controller.wait_for_completion().await);
        assert_eq!(backend.calls(), 0);
        assert_eq!(controller.state(), &UploadState::default());
    }

    #[tokio::test]
    async fn successful_upload_exposes_download_path() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.reply_upload("x.pdf", uploaded("ok", "/files/x.xlsx"));
        let mut controller = UploadController::new(backend.clone());

        controller.select_file(pdf("x.pdf"));
        controller.upload().unwrap();
        assert!(controller.wait_for_completion().await);

        assert_eq!(controller.state().status_message(), "ok");
        assert_eq!(controller.state().download_path(), Some("/files/x.xlsx"));
        assert_eq!(backend.uploaded_names(), vec!["x.pdf"]);
    }

    #[tokio::test]
    async fn failure_keeps_previous_download_path() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.reply_upload("x.pdf", uploaded("File processed successfully", "/download/x.xlsx"));
        backend.reply_upload("x.pdf", Err(server_error()));
        let mut controller = UploadController::new(backend.clone());

        controller.select_file(pdf("x.pdf"));
        controller.upload().unwrap();
        controller.wait_for_completion().await;
        controller.upload().unwrap();
        controller.wait_for_completion().await;

        assert_eq!(controller.state().status_message(), UPLOAD_FAILED_MESSAGE);
        assert_eq!(controller.state().download_path(), Some("/download/x.xlsx"));
    }

    #[tokio::test]
    async fn first_failure_leaves_download_path_unset() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.reply_upload("broken.pdf", Err(server_error()));
        let mut controller = UploadController::new(backend.clone());

        controller.select_file(pdf("broken.pdf"));
        controller.upload().unwrap();
        controller.wait_for_completion().await;

        assert_eq!(controller.state().status_message(), UPLOAD_FAILED_MESSAGE);
        assert_eq!(controller.state().download_path(), None);
        assert!(controller.state().selected_file().is_some());
    }

    #[tokio::test]
    async fn selecting_replaces_previous_file() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.reply_upload("b.pdf", uploaded("ok", "/download/b.xlsx"));
        let mut controller = UploadController::new(backend.clone());

        controller.select_file(pdf("a.pdf"));
        controller.select_file(pdf("b.pdf"));
        assert_eq!(backend.calls(), 0);

        controller.upload().unwrap();
        controller.wait_for_completion().await;
        assert_eq!(backend.uploaded_names(), vec!["b.pdf"]);
    }

    #[tokio::test]
    async fn last_response_to_arrive_wins() {
        let backend = Arc::new(ScriptedBackend::default());
        let first = backend.defer_upload("a.pdf");
        let second = backend.defer_upload("b.pdf");
        let mut controller = UploadController::new(backend.clone());

        controller.select_file(pdf("a.pdf"));
        controller.upload().unwrap();
        controller.select_file(pdf("b.pdf"));
        controller.upload().unwrap();
        assert_eq!(controller.in_flight(), 2);

        second.send(uploaded("second", "/download/b.xlsx")).unwrap();
        controller.wait_for_completion().await;
        first.send(uploaded("first", "/download/a.xlsx")).unwrap();
        controller.wait_for_completion().await;

        assert_eq!(controller.state().status_message(), "first");
        assert_eq!(controller.state().download_path(), Some("/download/a.xlsx"));
        assert_eq!(controller.in_flight(), 0);
    }

    #[tokio::test]
    async fn latest_issued_ignores_stale_response() {
        let backend = Arc::new(ScriptedBackend::default());
        let first = backend.defer_upload("a.pdf");
        let second = backend.defer_upload("b.pdf");
        let mut controller =
            UploadController::new(backend.clone()).with_ordering(ResponseOrdering::LatestIssued);

        controller.select_file(pdf("a.pdf"));
        controller.upload().unwrap();
        controller.select_file(pdf("b.pdf"));
        controller.upload().unwrap();

        second.send(uploaded("second", "/download/b.xlsx")).unwrap();
        controller.wait_for_completion().await;
        first.send(Err(server_error())).unwrap();
        controller.wait_for_completion().await;

        assert_eq!(controller.state().status_message(), "second");
        assert_eq!(controller.state().download_path(), Some("/download/b.xlsx"));
    }

    #[tokio::test]
    async fn hung_request_changes_nothing() {
        let backend = Arc::new(ScriptedBackend::default());
        let _pending = backend.defer_upload("slow.pdf");
        let mut controller = UploadController::new(backend.clone());

        controller.select_file(pdf("slow.pdf"));
        controller.upload().unwrap();
        tokio::task::yield_now().await;

        assert_eq!(controller.process_completions(), 0);
        assert_eq!(controller.in_flight(), 1);
        assert_eq!(controller.state().status_message(), "");
        assert_eq!(controller.state().download_path(), None);
    }
}
