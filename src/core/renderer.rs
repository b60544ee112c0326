use crate::error::Error;
use serde::Serialize;

pub const INDEX_TEMPLATE: &str = "polls/index.html";
pub const DETAIL_TEMPLATE: &str = "polls/detail.html";
pub const RESULTS_TEMPLATE: &str = "polls/results.html";

/// Turns a view-model into markup.
pub trait Renderer {
    fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String, Error>;
}
