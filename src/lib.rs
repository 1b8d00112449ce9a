pub mod commands;
pub mod host;
pub mod info;
pub mod recipe;
pub mod runtime;
pub mod tools;
