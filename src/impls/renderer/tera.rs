use crate::core::renderer::Renderer;
use crate::error::Error;
use ::tera::{Context, Tera};
use serde::Serialize;
use std::path::Path;

pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    pub fn new(template_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let pattern = template_dir.as_ref().join("**").join("*.html");
        let tera = Tera::new(&pattern.to_string_lossy())?;
        log::info!("loaded {} templates from {}", tera.get_template_names().count(), template_dir.as_ref().display());
        Ok(Self { tera })
    }
}

impl Renderer for TeraRenderer {
    fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String, Error> {
        let context = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &context)?)
    }
}
