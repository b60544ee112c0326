pub mod renderer;
pub mod repository;
