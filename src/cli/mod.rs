pub mod favorites;
pub mod rates;
pub mod settings;
pub mod setup;
pub mod symbols;
pub mod ui;
