pub mod models;
pub mod ports;
pub mod renderer;
pub mod services;
