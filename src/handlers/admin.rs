use crate::actix_web::web::{Data, Json, Path};
use crate::core::models::question::{QuestionCreate, QuestionDetail};
use crate::core::ports::repository::Manager;
use crate::core::services::poll::{create_question, delete_question, question_detail};
use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse};
use chrono::Utc;

pub async fn create<M>(Json(question): Json<QuestionCreate>, manager: Data<M>) -> Result<Json<CreateResponse>, Error>
where
    M: Manager + 'static,
{
    let id = create_question(manager.tx().await?, question, Utc::now()).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn detail<M>(question_id: Path<i32>, manager: Data<M>) -> Result<Json<QuestionDetail>, Error>
where
    M: Manager + 'static,
{
    let mut storer = manager.db().await?;
    Ok(Json(question_detail(&mut storer, question_id.into_inner()).await?))
}

pub async fn delete<M>(question_id: Path<i32>, manager: Data<M>) -> Result<Json<DeleteResponse>, Error>
where
    M: Manager + 'static,
{
    let mut storer = manager.db().await?;
    let deleted = delete_question(&mut storer, question_id.into_inner()).await?;
    Ok(Json(DeleteResponse::new(deleted)))
}
