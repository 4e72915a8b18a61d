pub mod cli;
pub mod commands;
pub mod locate;
pub mod utils;
