pub mod chart;
pub mod record;
pub mod settings;
