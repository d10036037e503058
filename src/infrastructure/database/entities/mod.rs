//! Database entities

pub mod alert;
pub mod known_face;
pub mod recognition;
pub mod scheduled_report;
pub mod system_settings;
pub mod user;
