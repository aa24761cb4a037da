pub mod generator;
pub mod matcher;
