use crate::core::models::{
    choice::{Choice, Insert as ChoiceInsert, Query as ChoiceQuery},
    common::Pagination,
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question},
};
use crate::error::Error;

pub trait QuestionCommon {
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error>;
    /// Questions matching `query`, newest `pub_date` first.
    async fn query(&mut self, query: QuestionQuery, pagination: Option<Pagination>) -> Result<Vec<Question>, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error>;
    /// Deletes the question together with its choices, returns the number of deleted questions.
    async fn delete(&mut self, id: i32) -> Result<u64, Error>;
}

pub trait ChoiceCommon {
    async fn insert(&mut self, choice: ChoiceInsert) -> Result<i32, Error>;
    async fn query(&mut self, query: ChoiceQuery) -> Result<Vec<Choice>, Error>;
    async fn get(&mut self, question_id: i32, id: i32) -> Result<Option<Choice>, Error>;
    /// Adds one vote in a single storage operation. False when no choice `id` belongs to `question_id`.
    async fn increment_votes(&mut self, question_id: i32, id: i32) -> Result<bool, Error>;
}

pub trait Store: QuestionCommon + ChoiceCommon {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Store: Store;
    type TxStore: TxStore;
    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::TxStore, Error>;
}
