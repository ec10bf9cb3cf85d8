pub mod chat;
pub mod context;
pub mod dock;
pub mod experiments;
pub mod generate;
pub mod history;
pub mod models;
pub mod output;
pub mod structure;
