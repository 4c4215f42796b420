use crate::chat::Sender;

/// Rendering surface the widget drives.
///
/// Hosts implement this against whatever presents the widget. Calls arrive from controller
/// tasks, so implementations must be cheap and must not block.
pub trait WidgetView: Send + Sync {
    /// Appends one transcript entry. `markup` is already formatted.
    fn append_message(&self, sender: Sender, markup: &str);
    fn set_typing(&self, visible: bool);
    fn set_widget_open(&self, open: bool);
    fn focus_input(&self);
    fn clear_input(&self);
    fn hide_quick_actions(&self);
    /// Shows the accept/decline actions under the lead invitation.
    fn offer_lead_capture(&self);
    fn withdraw_lead_offer(&self);
    fn set_lead_form_visible(&self, visible: bool);
    /// Moves focus to the first lead form field.
    fn focus_lead_form(&self);
    fn clear_lead_form(&self);
    /// Blocking notice, separate from the transcript.
    fn alert(&self, notice: &str);
}
