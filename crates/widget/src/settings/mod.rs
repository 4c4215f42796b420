/// Layered widget configuration.
pub mod state;

pub use state::{
    ContactSettings, EndpointSettings, SettingsError, SettingsResult, WidgetSettings,
};
