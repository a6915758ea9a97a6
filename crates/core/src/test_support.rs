use async_trait::async_trait;
use smart_analyst_backend::{
    AnalystBackend, ApiError, ApiResult, AskResponse, GraphsResponse, UploadFile, UploadResponse,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

enum Reply<T> {
    Now(ApiResult<T>),
    Later(oneshot::Receiver<ApiResult<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> ApiResult<T> {
        match self {
            Reply::Now(result) => result,
            Reply::Later(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Decode("reply dropped".into()))),
        }
    }
}

/// Backend whose answers are queued up front. Upload replies are keyed by file
/// name and ask replies by question so overlapping requests stay deterministic.
/// Anything unscripted fails with a 503.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    uploads: Mutex<HashMap<String, VecDeque<Reply<UploadResponse>>>>,
    graphs: Mutex<VecDeque<Reply<GraphsResponse>>>,
    answers: Mutex<HashMap<String, VecDeque<Reply<AskResponse>>>>,
    uploaded: Mutex<Vec<String>>,
    asked: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

pub(crate) fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: Some("Failed to extract data from PDF".to_string()),
    }
}

pub(crate) fn uploaded(message: &str, download_url: &str) -> ApiResult<UploadResponse> {
    Ok(UploadResponse {
        message: message.to_string(),
        download_url: download_url.to_string(),
    })
}

pub(crate) fn graphs(urls: &[&str]) -> ApiResult<GraphsResponse> {
    Ok(GraphsResponse {
        message: None,
        graph_urls: urls.iter().map(|u| u.to_string()).collect(),
    })
}

pub(crate) fn answer(text: Option<&str>) -> ApiResult<AskResponse> {
    Ok(AskResponse {
        answer: text.map(str::to_string),
    })
}

impl ScriptedBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn asked_questions(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn reply_upload(&self, file_name: &str, result: ApiResult<UploadResponse>) {
        self.uploads
            .lock()
            .unwrap()
            .entry(file_name.to_string())
            .or_default()
            .push_back(Reply::Now(result));
    }

    pub fn defer_upload(&self, file_name: &str) -> oneshot::Sender<ApiResult<UploadResponse>> {
        let (tx, rx) = oneshot::channel();
        self.uploads
            .lock()
            .unwrap()
            .entry(file_name.to_string())
            .or_default()
            .push_back(Reply::Later(rx));
        tx
    }

    pub fn reply_graphs(&self, result: ApiResult<GraphsResponse>) {
        self.graphs.lock().unwrap().push_back(Reply::Now(result));
    }

    pub fn defer_graphs(&self) -> oneshot::Sender<ApiResult<GraphsResponse>> {
        let (tx, rx) = oneshot::channel();
        self.graphs.lock().unwrap().push_back(Reply::Later(rx));
        tx
    }

    pub fn reply_ask(&self, question: &str, result: ApiResult<AskResponse>) {
        self.answers
            .lock()
            .unwrap()
            .entry(question.to_string())
            .or_default()
            .push_back(Reply::Now(result));
    }

    pub fn defer_ask(&self, question: &str) -> oneshot::Sender<ApiResult<AskResponse>> {
        let (tx, rx) = oneshot::channel();
        self.answers
            .lock()
            .unwrap()
            .entry(question.to_string())
            .or_default()
            .push_back(Reply::Later(rx));
        tx
    }
}

fn unscripted<T>() -> ApiResult<T> {
    Err(ApiError::Status {
        status: 503,
        message: None,
    })
}

#[async_trait]
impl AnalystBackend for ScriptedBackend {
    async fn upload(&self, file: UploadFile) -> ApiResult<UploadResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uploaded.lock().unwrap().push(file.file_name.clone());
        let reply = self
            .uploads
            .lock()
            .unwrap()
            .get_mut(&file.file_name)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(reply) => reply.resolve().await,
            None => unscripted(),
        }
    }

    async fn generate_graphs(&self) -> ApiResult<GraphsResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.graphs.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => unscripted(),
        }
    }

    async fn ask(&self, question: &str) -> ApiResult<AskResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.asked.lock().unwrap().push(question.to_string());
        let reply = self
            .answers
            .lock()
            .unwrap()
            .get_mut(question)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(reply) => reply.resolve().await,
            None => unscripted(),
        }
    }
}
