use super::*;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const ACCENT: Color = Color::Rgb(106, 76, 147);
const MUTED: Color = Color::Gray;
const EMPTY_CHAT: &str = "No conversation yet. Start by asking a question!";

impl App {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        self.layout.calculate_layout(area);
        let panels = self.layout.get_panels().to_vec();

        for panel in panels {
            match panel.panel_type {
                PanelType::Topbar => self.render_topbar(frame, panel.rect),
                PanelType::Upload => self.render_upload(frame, panel.rect),
                PanelType::Visualization => self.render_visualization(frame, panel.rect),
                PanelType::Chat => self.render_chat(frame, panel.rect),
                PanelType::StatusBar => self.render_status_bar(frame, panel.rect),
            }
        }

        if self.show_help {
            self.render_help(frame, area);
        }

        if let Some(ref popup) = self.popup {
            render_popup(frame, area, popup);
        }
    }

    fn panel_block(&self, title: &str, focus: Focus) -> Block<'static> {
        let border = if self.focus == focus {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {title} "))
    }

    fn render_topbar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " Smart Analyst ",
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )];

        let activity = [
            ("uploading", self.upload.in_flight()),
            ("generating", self.visualization.in_flight()),
            ("asking", self.chat.in_flight()),
        ];
        for (label, count) in activity.into_iter().filter(|(_, n)| *n > 0) {
            spans.push(Span::raw(format!("  {label} ({count})")));
        }
        spans.push(Span::styled(
            format!("  {}", self.api.base_url()),
            Style::default().fg(MUTED),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_upload(&self, frame: &mut Frame, area: Rect) {
        let state = self.upload.state();
        let mut lines = vec![Line::from(vec![
            Span::styled("File: ", Style::default().fg(MUTED)),
            Span::raw(self.path_input.as_str().to_string()),
        ])];

        lines.push(match state.selected_file() {
            Some(file) => Line::from(format!(
                "Selected: {} ({})",
                file.file_name,
                human_size(file.len())
            )),
            None => Line::styled("No file selected", Style::default().fg(MUTED)),
        });
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            state.status_message().to_string(),
            Style::default().add_modifier(Modifier::ITALIC),
        ));

        if let Some(path) = state.download_path() {
            let link = self
                .api
                .resolve(path)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| path.to_string());
            lines.push(Line::from(vec![
                Span::styled("Download: ", Style::default().fg(ACCENT)),
                Span::raw(link),
                Span::styled("  [Ctrl+D]", Style::default().fg(MUTED)),
            ]));
        }

        let block = self.panel_block("Upload & Process Data", Focus::Upload);
        let inner = block.inner(area);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );

        if self.focus == Focus::Upload && self.popup.is_none() && !self.show_help {
            let x = inner.x + 6 + self.path_input.cursor() as u16;
            frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }

    fn render_visualization(&self, frame: &mut Frame, area: Rect) {
        let urls = self.visualization.state().image_urls();
        let lines: Vec<Line> = if urls.is_empty() {
            vec![Line::styled(
                "No graphs yet. Press Enter to generate.",
                Style::default().fg(MUTED),
            )]
        } else {
            let mut lines = vec![Line::styled(
                "Generated Graphs:",
                Style::default().add_modifier(Modifier::BOLD),
            )];
            lines.extend(urls.iter().enumerate().skip(self.graph_scroll).map(|(i, url)| {
                let link = self
                    .api
                    .resolve(url)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| url.clone());
                Line::from(vec![
                    Span::styled(format!("Graph {}: ", i + 1), Style::default().fg(ACCENT)),
                    Span::raw(link),
                ])
            }));
            lines
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(self.panel_block("Data Visualization", Focus::Visualization))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_chat(&self, frame: &mut Frame, area: Rect) {
        let block = self.panel_block("Smart Analyst Chatbot", Focus::Chat);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(inner);

        let width = chunks[0].width.max(1) as usize;
        let history = self.chat.history();
        let lines: Vec<Line> = if history.is_empty() {
            vec![Line::styled(EMPTY_CHAT, Style::default().fg(MUTED))]
        } else {
            let mut lines = Vec::new();
            for (i, entry) in history.iter().enumerate() {
                let (q_style, a_style) = if i % 2 == 0 {
                    (Style::default().fg(Color::White).bg(ACCENT), Style::default())
                } else {
                    (Style::default(), Style::default().fg(Color::White).bg(ACCENT))
                };
                let stamp = entry.answered_at().with_timezone(&chrono::Local).format("%H:%M");
                lines.push(Line::styled(format!("[{stamp}] You"), Style::default().fg(MUTED)));
                lines.extend(
                    wrap_text(entry.question(), width)
                        .into_iter()
                        .map(|l| Line::styled(l, q_style)),
                );
                lines.push(Line::styled("AI", Style::default().fg(MUTED)));
                lines.extend(
                    wrap_text(entry.answer(), width)
                        .into_iter()
                        .map(|l| Line::styled(l, a_style)),
                );
                lines.push(Line::raw(""));
            }
            lines
        };

        let height = chunks[0].height as usize;
        let max_offset = lines.len().saturating_sub(height);
        let offset = max_offset.saturating_sub(self.chat_scroll);
        frame.render_widget(
            Paragraph::new(lines).scroll((offset as u16, 0)),
            chunks[0],
        );

        let input = if self.chat_input.is_empty() {
            Paragraph::new(Line::styled(
                "Type your question here...",
                Style::default().fg(MUTED),
            ))
        } else {
            Paragraph::new(self.chat_input.as_str().to_string())
        };
        let input_block = Block::default().borders(Borders::ALL).title(" Send [Enter] ");
        let input_inner = input_block.inner(chunks[1]);
        frame.render_widget(input.block(input_block), chunks[1]);

        if self.focus == Focus::Chat && self.popup.is_none() && !self.show_help {
            let x = input_inner.x + self.chat_input.cursor() as u16;
            frame.set_cursor_position((
                x.min(input_inner.right().saturating_sub(1)),
                input_inner.y,
            ));
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(ref err) = self.last_error {
            Line::styled(format!(" {err} "), Style::default().fg(Color::Red))
        } else if let Some(ref status) = self.status_line {
            Line::raw(format!(" {status} "))
        } else {
            Line::styled(self.keybinds.status_hint(), Style::default().fg(MUTED))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let rect = centered_rect(60, 80, area);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(self.keybinds.help_text())
                .block(Block::default().borders(Borders::ALL).title(" Help [F1] ")),
            rect,
        );
    }
}

fn render_popup(frame: &mut Frame, area: Rect, popup: &Popup) {
    let (title, color) = match popup {
        Popup::Prompt(_) => (" Attention ", Color::Yellow),
        Popup::Notice(_) => (" Notice ", ACCENT),
    };
    let rect = centered_rect(50, 20, area);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(format!("\n{}\n\n[Enter] OK", popup.text()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(title),
            ),
        rect,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn human_size(bytes: usize) -> String {
    match bytes {
        b if b < 1024 => format!("{b} B"),
        b if b < 1024 * 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
    }
}

/// Hard-wraps `text` to `width` columns, keeping explicit line breaks.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split(' ') {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            while current.chars().count() > width {
                let head: String = current.chars().take(width).collect();
                let tail: String = current.chars().skip(width).collect();
                out.push(head);
                current = tail;
            }
        }
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn wrap_breaks_on_words_and_long_tokens() {
        assert_eq!(wrap_text("net income rose", 10), vec!["net income", "rose"]);
        assert_eq!(wrap_text("abcdefghij12", 5), vec!["abcde", "fghij", "12"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_session_shows_placeholders() {
        let mut app = App::new(Config::default()).unwrap();
        let text = screen_text(&mut app);

        assert!(text.contains("Upload & Process Data"));
        assert!(text.contains("Data Visualization"));
        assert!(text.contains("Smart Analyst Chatbot"));
        assert!(text.contains("No file selected"));
        assert!(text.contains(EMPTY_CHAT));
    }

    #[test]
    fn prompt_popup_is_drawn() {
        let mut app = App::new(Config::default()).unwrap();
        app.popup = Some(Popup::Prompt("Please select a file first.".to_string()));
        let text = screen_text(&mut app);
        assert!(text.contains("Please select a file first."));
    }
}
