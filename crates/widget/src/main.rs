use std::process::ExitCode;
use std::sync::Arc;

use chatline::app::{Handled, WidgetApp};
use chatline::events::{Control, Gesture, Payload, UiEvent};
use chatline::lead::{LeadFields, LeadOutcome};
use chatline::settings::WidgetSettings;
use chatline::terminal::TerminalView;
use chatline_transport::HttpTransport;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const FORM_PROMPTS: [&str; 5] = [
    "name",
    "email",
    "phone (optional)",
    "company (optional)",
    "message (optional)",
];

/// Lead form fields typed one line at a time.
#[derive(Debug, Default)]
struct FormEntry {
    values: Vec<String>,
}

impl FormEntry {
    fn prompt(&self) -> Option<&'static str> {
        FORM_PROMPTS.get(self.values.len()).copied()
    }

    /// Stores `line` as the next field and returns true once every field is filled.
    fn push(&mut self, line: &str) -> bool {
        self.values.push(line.trim().to_string());
        self.prompt().is_none()
    }

    fn fields(&self) -> LeadFields {
        let optional = |index: usize| {
            self.values
                .get(index)
                .filter(|value| !value.is_empty())
                .cloned()
        };

        LeadFields {
            name: self.values.first().cloned().unwrap_or_default(),
            email: self.values.get(1).cloned().unwrap_or_default(),
            phone: optional(2),
            company: optional(3),
            message: optional(4),
        }
    }
}

fn print_help(app: &WidgetApp) {
    println!("type a message and press enter; /quit to exit, /toggle to open or close");
    for (index, preset) in app.quick_actions().iter().enumerate() {
        println!("  /{} {preset}", index + 1);
    }
}

fn quick_action(app: &WidgetApp, command: &str) -> Option<String> {
    let index = command.parse::<usize>().ok()?.checked_sub(1)?;
    app.quick_actions().get(index).cloned()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let settings = match WidgetSettings::load() {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(%error, "failed to load settings");
            return ExitCode::FAILURE;
        }
    };

    let transport = match HttpTransport::new(settings.to_endpoints()) {
        Ok(transport) => transport,
        Err(error) => {
            tracing::error!(stage = error.stage(), %error, "failed to build transport");
            return ExitCode::FAILURE;
        }
    };

    let app = WidgetApp::new(Arc::new(transport), Arc::new(TerminalView::new()), &settings);
    app.start();
    app.toggle().await;
    print_help(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut form: Option<FormEntry> = None;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::error!(%error, "failed to read input");
                return ExitCode::FAILURE;
            }
        };
        let command = line.trim();

        match command {
            "/quit" => break,
            "/close" => {
                form = None;
                app.handle_event(UiEvent::click(Control::LeadFormClose)).await;
                continue;
            }
            _ => {}
        }

        if let Some(entry) = form.as_mut() {
            if entry.prompt().is_some() && !entry.push(&line) {
                if let Some(prompt) = entry.prompt() {
                    println!("  {prompt}:");
                }
                continue;
            }

            let submit = UiEvent {
                control: Control::LeadForm,
                gesture: Gesture::Submit,
                payload: Payload::Lead(entry.fields()),
            };
            match app.handle_event(submit).await {
                Handled::Lead(LeadOutcome::Submitted) => form = None,
                _ => println!("  press enter to retry, /close to cancel"),
            }
            continue;
        }

        let event = match command {
            "/toggle" => UiEvent::click(Control::ToggleButton),
            "/yes" => {
                let entry = FormEntry::default();
                let accepted = app.handle_event(UiEvent::click(Control::LeadAccept)).await;
                if accepted != Handled::Surface {
                    println!("  no callback offer is open");
                    continue;
                }
                if let Some(prompt) = entry.prompt() {
                    println!("  {prompt}:");
                }
                form = Some(entry);
                continue;
            }
            "/no" => UiEvent::click(Control::LeadDecline),
            _ => match command
                .strip_prefix('/')
                .and_then(|index| quick_action(&app, index))
            {
                Some(preset) => UiEvent::click(Control::QuickAction)
                    .with_payload(Payload::Text(preset)),
                None => UiEvent {
                    control: Control::ChatInput,
                    gesture: Gesture::Enter { shift: false },
                    payload: Payload::Text(line),
                },
            },
        };

        // Input keeps flowing while a reply is pending; the session drops overlapping sends.
        let app = app.clone();
        tokio::spawn(async move {
            app.handle_event(event).await;
        });
    }

    ExitCode::SUCCESS
}
