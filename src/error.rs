use crate::actix_web::{http::StatusCode, HttpResponse, ResponseError};
use crate::sqlx::migrate::MigrateError;
use crate::tera::Error as TeraError;
use crate::thiserror::Error as ThisError;
use std::io;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migrate error: {0}")]
    MigrateError(#[from] MigrateError),

    #[error("template error: {0}")]
    TemplateError(#[from] TeraError),

    #[error("io error: {0}")]
    IOError(#[from] io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bussiness error: {0}")]
    BusinessError(String),

    #[error("server error: {0}")]
    ServerError(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) | Error::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Error::BusinessError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
            return HttpResponse::build(status).body(status.canonical_reason().unwrap_or("Internal Server Error"));
        }
        HttpResponse::build(status).body(self.to_string())
    }
}
