use crate::lead::LeadFields;

/// Interactive element of the widget surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    ToggleButton,
    SendButton,
    ChatInput,
    QuickAction,
    LeadAccept,
    LeadDecline,
    LeadFormClose,
    LeadFormBackdrop,
    LeadForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Click,
    /// Form submission.
    Submit,
    Enter { shift: bool },
}

/// What the widget does in response to a bound gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    ToggleWidget,
    SendInput,
    SendQuickAction,
    OpenLeadForm,
    DeclineLeadOffer,
    CloseLeadForm,
    SubmitLead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub control: Control,
    pub gesture: Gesture,
    pub intent: Intent,
}

const fn bind(control: Control, gesture: Gesture, intent: Intent) -> Binding {
    Binding {
        control,
        gesture,
        intent,
    }
}

pub static BINDINGS: &[Binding] = &[
    bind(Control::ToggleButton, Gesture::Click, Intent::ToggleWidget),
    bind(Control::SendButton, Gesture::Click, Intent::SendInput),
    bind(
        Control::ChatInput,
        Gesture::Enter { shift: false },
        Intent::SendInput,
    ),
    bind(Control::QuickAction, Gesture::Click, Intent::SendQuickAction),
    bind(Control::LeadAccept, Gesture::Click, Intent::OpenLeadForm),
    bind(Control::LeadDecline, Gesture::Click, Intent::DeclineLeadOffer),
    bind(Control::LeadFormClose, Gesture::Click, Intent::CloseLeadForm),
    bind(Control::LeadFormBackdrop, Gesture::Click, Intent::CloseLeadForm),
    bind(Control::LeadForm, Gesture::Submit, Intent::SubmitLead),
];

/// Looks up the intent bound to `gesture` on `control`.
pub fn resolve(control: Control, gesture: Gesture) -> Option<Intent> {
    BINDINGS
        .iter()
        .find(|binding| binding.control == control && binding.gesture == gesture)
        .map(|binding| binding.intent)
}

/// Data carried by an event: the input text, a quick-action message or the lead form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Payload {
    #[default]
    None,
    Text(String),
    Lead(LeadFields),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub control: Control,
    pub gesture: Gesture,
    pub payload: Payload,
}

impl UiEvent {
    pub fn click(control: Control) -> Self {
        Self {
            control,
            gesture: Gesture::Click,
            payload: Payload::None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn intent(&self) -> Option<Intent> {
        resolve(self.control, self.gesture)
    }
}
