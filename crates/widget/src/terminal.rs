use std::io::Write;

use crate::chat::{LINE_BREAK, Sender};
use crate::view::WidgetView;

/// Flattens widget markup for a plain-text transcript.
pub fn markup_to_plain(markup: &str) -> String {
    markup
        .replace(LINE_BREAK, "\n")
        .replace("<strong>", "")
        .replace("</strong>", "")
}

/// Renders the widget as a line-oriented transcript on stdout.
#[derive(Debug, Default)]
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }

    fn print(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout only loses transcript output.
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }
}

impl WidgetView for TerminalView {
    fn append_message(&self, sender: Sender, markup: &str) {
        self.print(&format!("{}> {}", sender.as_str(), markup_to_plain(markup)));
    }

    fn set_typing(&self, visible: bool) {
        if visible {
            self.print("bot is typing...");
        }
    }

    fn set_widget_open(&self, open: bool) {
        self.print(if open { "[chat opened]" } else { "[chat closed]" });
    }

    fn focus_input(&self) {}

    fn clear_input(&self) {}

    fn hide_quick_actions(&self) {
        tracing::debug!("quick actions hidden");
    }

    fn offer_lead_capture(&self) {
        self.print("  /yes to share your details, /no to skip");
    }

    fn withdraw_lead_offer(&self) {
        self.print("[offer dismissed]");
    }

    fn set_lead_form_visible(&self, visible: bool) {
        if visible {
            self.print("[contact form] name, email, then optional phone, company, message");
        } else {
            self.print("[contact form closed]");
        }
    }

    fn focus_lead_form(&self) {}

    fn clear_lead_form(&self) {}

    fn alert(&self, notice: &str) {
        self.print(&format!("!! {notice}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::format_message;

    #[test]
    fn formatted_reply_flattens_back_to_lines() {
        let markup = format_message("**Rates**\n- FCL\n- LCL");

        assert_eq!(markup_to_plain(&markup), "Rates\n• FCL\n• LCL");
    }
}
