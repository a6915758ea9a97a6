pub struct Keybinds;

impl Default for Keybinds {
    fn default() -> Self {
        Self
    }
}

impl Keybinds {
    pub fn help_text(&self) -> String {
        r#"Keyboard Shortcuts:

Panels:
  Tab / Shift+Tab   Next / previous panel
  Ctrl + ← / →      Resize columns

Upload & Process:
  type a path       Path of the PDF to process
  Enter             Select the file at that path
  Ctrl + U          Upload the selected file
  Ctrl + D          Download the processed Excel file

Data Visualization:
  Enter / g         Generate graphs
  s                 Save graph images
  ↑ / ↓             Scroll graph list

Chatbot:
  type              Compose a question
  Enter             Send
  ↑ / ↓             Scroll conversation

General:
  F1                Toggle this help
  Esc               Dismiss popup
  Ctrl + Q          Quit
"#
        .to_string()
    }

    pub fn status_hint(&self) -> &'static str {
        " Tab: panel | Ctrl+U: upload | Ctrl+D: download | F1: help | Ctrl+Q: quit "
    }
}
