use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelType {
    Topbar,
    Upload,
    Visualization,
    Chat,
    StatusBar,
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub panel_type: PanelType,
    pub rect: Rect,
}
