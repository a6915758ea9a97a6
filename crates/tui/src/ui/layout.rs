use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::panel::{Panel, PanelType};

const MIN_LEFT_PERCENT: u16 = 30;
const MAX_LEFT_PERCENT: u16 = 70;
const TOPBAR_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;
const UPLOAD_HEIGHT: u16 = 10;

pub struct LayoutState {
    left_percent: u16,
    cached_panels: Vec<Panel>,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            left_percent: 50,
            cached_panels: Vec::new(),
        }
    }
}

impl LayoutState {
    pub fn calculate_layout(&mut self, area: Rect) -> &[Panel] {
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TOPBAR_HEIGHT),
                Constraint::Min(1),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(self.left_percent),
                Constraint::Percentage(100 - self.left_percent),
            ])
            .split(main_layout[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(UPLOAD_HEIGHT), Constraint::Min(3)])
            .split(columns[0]);

        self.cached_panels = vec![
            Panel {
                panel_type: PanelType::Topbar,
                rect: main_layout[0],
            },
            Panel {
                panel_type: PanelType::Upload,
                rect: left[0],
            },
            Panel {
                panel_type: PanelType::Visualization,
                rect: left[1],
            },
            Panel {
                panel_type: PanelType::Chat,
                rect: columns[1],
            },
            Panel {
                panel_type: PanelType::StatusBar,
                rect: main_layout[2],
            },
        ];

        &self.cached_panels
    }

    pub fn get_panels(&self) -> &[Panel] {
        &self.cached_panels
    }

    pub fn left_percent(&self) -> u16 {
        self.left_percent
    }

    /// Moves the column split by `delta` percentage points.
    pub fn resize(&mut self, delta: i16) {
        self.left_percent = (self.left_percent as i16 + delta)
            .clamp(MIN_LEFT_PERCENT as i16, MAX_LEFT_PERCENT as i16) as u16;
    }

    pub fn panel_rect(&self, panel_type: PanelType) -> Option<Rect> {
        self.cached_panels
            .iter()
            .find(|p| p.panel_type == panel_type)
            .map(|p| p.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_three_workflow_panels() {
        let mut layout = LayoutState::default();
        layout.calculate_layout(Rect::new(0, 0, 120, 40));

        let upload = layout.panel_rect(PanelType::Upload).unwrap();
        let graphs = layout.panel_rect(PanelType::Visualization).unwrap();
        let chat = layout.panel_rect(PanelType::Chat).unwrap();

        assert_eq!(upload.x, graphs.x);
        assert_eq!(upload.height, UPLOAD_HEIGHT);
        assert!(chat.x >= upload.x + upload.width);
        assert_eq!(layout.get_panels().len(), 5);
    }

    #[test]
    fn resize_is_clamped() {
        let mut layout = LayoutState::default();
        layout.resize(-100);
        assert_eq!(layout.left_percent(), MIN_LEFT_PERCENT);
        layout.resize(100);
        assert_eq!(layout.left_percent(), MAX_LEFT_PERCENT);
    }
}
