#[cfg(test)]
macro_rules! test_app {
    ($manager:expr) => {
        crate::actix_web::test::init_service(
            crate::actix_web::App::new()
                .app_data(crate::actix_web::web::Data::new($manager))
                .app_data(crate::actix_web::web::Data::new(crate::handlers::testing::renderer()))
                .configure(
                    crate::handlers::routes::<
                        crate::impls::repository::memory::MemoryManager,
                        crate::impls::renderer::tera::TeraRenderer,
                    >,
                ),
        )
        .await
    };
}

pub mod admin;
pub mod poll;

use crate::actix_web::{
    http::header::ContentType,
    web::{delete, get, post, scope, ServiceConfig},
    HttpResponse,
};
use crate::core::ports::repository::Manager;
use crate::core::renderer::Renderer;
use crate::error::Error;
use serde::Serialize;

pub fn routes<M, R>(cfg: &mut ServiceConfig)
where
    M: Manager + 'static,
    R: Renderer + 'static,
{
    cfg.service(
        scope("polls")
            .route("/", get().to(poll::index::<M, R>))
            .route("/{question_id}/", get().to(poll::detail::<M, R>))
            .route("/{question_id}/results/", get().to(poll::results::<M, R>))
            .route("/{question_id}/vote/", post().to(poll::vote::<M, R>)),
    )
    .service(
        scope("admin/questions")
            .route("", post().to(admin::create::<M>))
            .route("/{question_id}", get().to(admin::detail::<M>))
            .route("/{question_id}", delete().to(admin::delete::<M>)),
    );
}

fn render<R, C>(renderer: &R, template: &str, context: &C) -> Result<HttpResponse, Error>
where
    R: Renderer,
    C: Serialize,
{
    let html = renderer.render(template, context)?;
    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}
