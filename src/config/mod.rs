pub mod env_provider;
pub mod settings;

pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use settings::{Settings, SettingsError};
