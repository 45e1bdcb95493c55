pub mod audio;
pub mod compute;
pub mod config;
pub mod controller;
pub mod entities;
pub mod error;
pub mod renderer;
