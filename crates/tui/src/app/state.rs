use super::*;

pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub api: AnalystApi,
    pub upload: UploadController,
    pub visualization: VisualizationController,
    pub chat: ChatController,
    pub focus: Focus,
    pub path_input: InputState,
    pub chat_input: InputState,
    pub layout: LayoutState,
    pub keybinds: Keybinds,
    pub show_help: bool,
    pub popup: Option<Popup>,
    pub graph_scroll: usize,
    /// Lines scrolled up from the newest chat entry.
    pub chat_scroll: usize,
    pub status_line: Option<String>,
    /// Which running task set `status_line`; `None` for finished-work reports.
    pub status_owner: Option<Activity>,
    pub last_error: Option<String>,
    pub downloads_dir: PathBuf,
    pub app_async_tx: Option<mpsc::UnboundedSender<AppAsyncEvent>>,
    pub app_async_rx: Option<mpsc::UnboundedReceiver<AppAsyncEvent>>,
}

impl App {
    pub fn new(config: Config) -> ApiResult<Self> {
        let api = AnalystApi::with_timeouts(&config.backend.base_url, config.backend.timeouts())?;
        let backend: Arc<dyn AnalystBackend> = Arc::new(api.clone());
        Ok(Self::with_backend(config, api, backend))
    }

    /// Builds the app around any backend; `api` is still used for downloads and URLs.
    pub fn with_backend(config: Config, api: AnalystApi, backend: Arc<dyn AnalystBackend>) -> Self {
        let (app_async_tx, app_async_rx) = mpsc::unbounded_channel();
        let ordering = config.workflow.ordering;
        let downloads_dir = config.downloads.resolve_dir();

        Self {
            should_quit: false,
            upload: UploadController::new(Arc::clone(&backend)).with_ordering(ordering),
            visualization: VisualizationController::new(Arc::clone(&backend))
                .with_ordering(ordering),
            chat: ChatController::new(backend),
            config,
            api,
            focus: Focus::Upload,
            path_input: InputState::new(),
            chat_input: InputState::new(),
            layout: LayoutState::default(),
            keybinds: Keybinds,
            show_help: false,
            popup: None,
            graph_scroll: 0,
            chat_scroll: 0,
            status_line: None,
            status_owner: None,
            last_error: None,
            downloads_dir,
            app_async_tx: Some(app_async_tx),
            app_async_rx: Some(app_async_rx),
        }
    }
}
