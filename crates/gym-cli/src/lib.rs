pub mod cli;
pub mod commands;
pub mod dialogs;
pub mod formatting;
