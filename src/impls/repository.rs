pub mod memory;
pub mod pg;
