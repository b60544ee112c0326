use crate::core::models::{
    choice::{Insert as ChoiceInsert, Query as ChoiceQuery},
    common::{validate_text, Pagination},
    question::{IndexPage, Insert as QuestionInsert, Query as QuestionQuery, Question, QuestionCreate, QuestionDetail, QuestionResults, QuestionSummary},
};
use crate::core::ports::repository::{ChoiceCommon, QuestionCommon, Store, TxStore};
use crate::error::Error;
use chrono::{DateTime, Utc};

pub const LATEST_QUESTION_COUNT: i64 = 5;
pub const INVALID_CHOICE_MESSAGE: &str = "Select a valid choice.";

#[derive(Debug)]
pub enum VoteOutcome {
    /// The vote was stored, the client should be sent to the results page.
    Accepted { question_id: i32 },
    /// Nothing was stored, the detail page is shown again with an error.
    Rejected(QuestionDetail),
}

/// The most recently published questions, leaving out those dated after `now`.
pub async fn latest_questions<S>(storer: &mut S, now: DateTime<Utc>) -> Result<IndexPage, Error>
where
    S: Store,
{
    let questions = QuestionCommon::query(
        storer,
        QuestionQuery { pub_date_le: Some(now) },
        Some(Pagination::new(LATEST_QUESTION_COUNT, None)),
    )
    .await?;
    Ok(IndexPage {
        latest_question_list: questions.into_iter().map(|q| QuestionSummary::new(q, now)).collect(),
    })
}

async fn get_question<S>(storer: &mut S, id: i32) -> Result<Question, Error>
where
    S: Store,
{
    QuestionCommon::get(storer, id).await?.ok_or_else(|| Error::NotFound(format!("question {}", id)))
}

pub async fn question_detail<S>(storer: &mut S, id: i32) -> Result<QuestionDetail, Error>
where
    S: Store,
{
    let question = get_question(storer, id).await?;
    let choices = ChoiceCommon::query(storer, ChoiceQuery { question_id_eq: Some(id) }).await?;
    Ok(QuestionDetail {
        question,
        choices,
        error_message: None,
    })
}

pub async fn question_results<S>(storer: &mut S, id: i32) -> Result<QuestionResults, Error>
where
    S: Store,
{
    let QuestionDetail { question, choices, .. } = question_detail(storer, id).await?;
    Ok(QuestionResults::new(question, choices))
}

/// Records one vote for `choice` on question `question_id`.
///
/// `choice` is the raw form value. A missing value, one that is not a number,
/// or one naming a choice of another question leaves every counter untouched
/// and yields [`VoteOutcome::Rejected`].
pub async fn vote<S>(storer: &mut S, question_id: i32, choice: Option<&str>) -> Result<VoteOutcome, Error>
where
    S: Store,
{
    let question = get_question(storer, question_id).await?;
    let choice_id = match choice.and_then(|c| c.trim().parse::<i32>().ok()) {
        Some(id) => id,
        None => return reject(storer, question, choice).await,
    };
    if ChoiceCommon::get(storer, question_id, choice_id).await?.is_none() {
        return reject(storer, question, choice).await;
    }
    if !ChoiceCommon::increment_votes(storer, question_id, choice_id).await? {
        // the choice went away between the lookup and the update
        return reject(storer, question, choice).await;
    }
    log::info!("vote recorded for choice {} of question {}", choice_id, question_id);
    Ok(VoteOutcome::Accepted { question_id })
}

async fn reject<S>(storer: &mut S, question: Question, choice: Option<&str>) -> Result<VoteOutcome, Error>
where
    S: Store,
{
    log::warn!("rejected vote on question {}: invalid choice {:?}", question.id, choice);
    let choices = ChoiceCommon::query(storer, ChoiceQuery { question_id_eq: Some(question.id) }).await?;
    Ok(VoteOutcome::Rejected(QuestionDetail {
        question,
        choices,
        error_message: Some(INVALID_CHOICE_MESSAGE.into()),
    }))
}

pub async fn create_question<T>(mut storer: T, question: QuestionCreate, now: DateTime<Utc>) -> Result<i32, Error>
where
    T: TxStore,
{
    validate_text("question_text", &question.question_text)?;
    for c in &question.choices {
        validate_text("choice_text", c)?;
    }
    let question_id = QuestionCommon::insert(
        &mut storer,
        QuestionInsert {
            question_text: question.question_text,
            pub_date: question.pub_date.unwrap_or(now),
        },
    )
    .await?;
    for choice_text in question.choices {
        if let Err(e) = ChoiceCommon::insert(&mut storer, ChoiceInsert { question_id, choice_text }).await {
            storer.rollback().await?;
            return Err(e);
        }
    }
    storer.commit().await?;
    log::info!("created question {}", question_id);
    Ok(question_id)
}

pub async fn delete_question<S>(storer: &mut S, id: i32) -> Result<u64, Error>
where
    S: Store,
{
    let deleted = QuestionCommon::delete(storer, id).await?;
    if deleted == 0 {
        return Err(Error::NotFound(format!("question {}", id)));
    }
    log::info!("deleted question {} and its choices", id);
    Ok(deleted)
}
