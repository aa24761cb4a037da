pub mod background;
pub mod host;
pub mod messages;
