use crate::completion::{Completion, Completions, ResponseOrdering};
use smart_analyst_backend::{AnalystBackend, ApiResult, GraphsResponse};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphNotice {
    NothingGenerated,
    Failed,
}

impl fmt::Display for GraphNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphNotice::NothingGenerated => f.write_str("No graphs were generated."),
            GraphNotice::Failed => f.write_str("Failed to generate graphs."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualizationState {
    image_urls: Vec<String>,
    notice: Option<GraphNotice>,
}

impl VisualizationState {
    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    pub fn notice(&self) -> Option<GraphNotice> {
        self.notice
    }
}

pub struct VisualizationController {
    state: VisualizationState,
    backend: Arc<dyn AnalystBackend>,
    completions: Completions<ApiResult<GraphsResponse>>,
}

impl VisualizationController {
    pub fn new(backend: Arc<dyn AnalystBackend>) -> Self {
        Self {
            state: VisualizationState::default(),
            backend,
            completions: Completions::new(ResponseOrdering::default()),
        }
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.completions.set_ordering(ordering);
        self
    }

    pub fn state(&self) -> &VisualizationState {
        &self.state
    }

    pub fn generate_graphs(&mut self) {
        let backend = Arc::clone(&self.backend);
        let seq = self
            .completions
            .spawn(async move { backend.generate_graphs().await });
        tracing::info!(seq, "Graph generation issued");
    }

    /// Hands out the pending notice, if any, so it is shown once.
    pub fn take_notice(&mut self) -> Option<GraphNotice> {
        self.state.notice.take()
    }

    pub fn in_flight(&self) -> usize {
        self.completions.in_flight()
    }

    pub fn process_completions(&mut self) -> usize {
        let mut handled = 0;
        while let Some(completion) = self.completions.try_next() {
            self.apply(completion);
            handled += 1;
        }
        handled
    }

    pub async fn wait_for_completion(&mut self) -> bool {
        match self.completions.next().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, completion: Completion<ApiResult<GraphsResponse>>) {
        let Completion { seq, outcome } = completion;
        if !self.completions.admit(seq) {
            tracing::debug!(seq, "Dropping stale graph response");
            return;
        }

        match outcome {
            Ok(response) if !response.graph_urls.is_empty() => {
                tracing::info!(seq, count = response.graph_urls.len(), "Graphs generated");
                self.state.image_urls = response.graph_urls;
                self.state.notice = None;
            }
            Ok(_) => {
                tracing::info!(seq, "Backend returned no graphs");
                self.state.notice = Some(GraphNotice::NothingGenerated);
            }
            Err(e) => {
                tracing::warn!(seq, kind = e.kind(), "Graph generation failed: {e}");
                self.state.notice = Some(GraphNotice::Failed);
            }
        }
    }
}
