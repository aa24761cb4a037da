pub mod effects;
pub mod engine;
pub mod observer;
pub mod stylesheet;
