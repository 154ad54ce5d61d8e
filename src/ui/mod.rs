pub mod app;
pub mod board;
pub mod controller;
pub mod dialogs;
pub mod rendering;
