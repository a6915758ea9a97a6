use super::*;

impl App {
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key_event(key),
            Event::Resize(_, _) => Ok(false),
            _ => Ok(false),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if key.code == KeyCode::Char('q') && ctrl {
            self.should_quit = true;
            return Ok(true);
        }

        if self.popup.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.popup = None;
            }
            return Ok(false);
        }

        if key.code == KeyCode::F(1) {
            self.show_help = !self.show_help;
            return Ok(false);
        }

        if self.show_help {
            if key.code == KeyCode::Esc {
                self.show_help = false;
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Ok(false);
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return Ok(false);
            }
            KeyCode::Left if ctrl => {
                self.layout.resize(-5);
                return Ok(false);
            }
            KeyCode::Right if ctrl => {
                self.layout.resize(5);
                return Ok(false);
            }
            KeyCode::Char('u') if ctrl => {
                self.start_upload();
                return Ok(false);
            }
            KeyCode::Char('d') if ctrl => {
                self.download_artifact();
                return Ok(false);
            }
            KeyCode::Char('s') if ctrl => {
                self.save_graphs();
                return Ok(false);
            }
            KeyCode::Esc => {
                self.clear_error();
                return Ok(false);
            }
            KeyCode::Up => {
                self.scroll_up();
                return Ok(false);
            }
            KeyCode::Down => {
                self.scroll_down();
                return Ok(false);
            }
            _ => {}
        }

        match self.focus {
            Focus::Upload => {
                if key.code == KeyCode::Enter {
                    self.select_file_from_input();
                } else {
                    edit_line(&mut self.path_input, key);
                }
            }
            Focus::Visualization => match key.code {
                KeyCode::Enter | KeyCode::Char('g') => self.start_graph_generation(),
                KeyCode::Char('s') => self.save_graphs(),
                _ => {}
            },
            Focus::Chat => {
                if key.code == KeyCode::Enter {
                    self.submit_question();
                } else if edit_line(&mut self.chat_input, key) {
                    self.chat.set_pending_question(self.chat_input.as_str());
                }
            }
        }

        Ok(false)
    }
}

/// Applies an editing key to `input`. Returns whether the text changed.
fn edit_line(input: &mut InputState, key: KeyEvent) -> bool {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }

    match key.code {
        KeyCode::Char(c) => {
            input.handle_char(c);
            true
        }
        KeyCode::Backspace => {
            input.handle_backspace();
            true
        }
        KeyCode::Delete => {
            input.handle_delete();
            true
        }
        KeyCode::Left => {
            input.move_left();
            false
        }
        KeyCode::Right => {
            input.move_right();
            false
        }
        KeyCode::Home => {
            input.move_home();
            false
        }
        KeyCode::End => {
            input.move_end();
            false
        }
        _ => false,
    }
}
