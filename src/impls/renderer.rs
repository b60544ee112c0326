pub mod tera;
