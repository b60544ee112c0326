use crate::core::models::{
    choice::{Choice, Insert as ChoiceInsert, Query as ChoiceQuery},
    common::Pagination,
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question},
};
use crate::core::ports::repository::{ChoiceCommon, Manager, QuestionCommon, Store, TxStore};
use crate::error::Error;
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO questions (question_text, pub_date) VALUES ($1, $2) RETURNING id")
            .bind(question.question_text)
            .bind(question.pub_date)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn query(&mut self, query: QuestionQuery, pagination: Option<Pagination>) -> Result<Vec<Question>, Error> {
        let mut stmt: QueryBuilder<Postgres> = QueryBuilder::new("SELECT id, question_text, pub_date FROM questions WHERE 1 = 1");
        if let Some(pub_date) = query.pub_date_le {
            stmt.push(" AND pub_date <= ");
            stmt.push_bind(pub_date);
        }
        stmt.push(" ORDER BY pub_date DESC, id DESC");
        if let Some(pagination) = pagination {
            stmt.push(" LIMIT ");
            stmt.push_bind(pagination.limit);
            if let Some(offset) = pagination.offset {
                stmt.push(" OFFSET ");
                stmt.push_bind(offset);
            }
        }
        let questions = stmt.build_query_as::<Question>().fetch_all(&mut self.executor).await?;
        Ok(questions)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error> {
        let question = query_as("SELECT id, question_text, pub_date FROM questions WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(question)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        // choices go with ON DELETE CASCADE
        let res = query("DELETE FROM questions WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(res.rows_affected())
    }
}

impl<E> ChoiceCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, choice: ChoiceInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO choices (question_id, choice_text) VALUES ($1, $2) RETURNING id")
            .bind(choice.question_id)
            .bind(choice.choice_text)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn query(&mut self, query: ChoiceQuery) -> Result<Vec<Choice>, Error> {
        let mut stmt: QueryBuilder<Postgres> = QueryBuilder::new("SELECT id, question_id, choice_text, votes FROM choices WHERE 1 = 1");
        if let Some(question_id) = query.question_id_eq {
            stmt.push(" AND question_id = ");
            stmt.push_bind(question_id);
        }
        stmt.push(" ORDER BY id");
        let choices = stmt.build_query_as::<Choice>().fetch_all(&mut self.executor).await?;
        Ok(choices)
    }

    async fn get(&mut self, question_id: i32, id: i32) -> Result<Option<Choice>, Error> {
        let choice = query_as("SELECT id, question_id, choice_text, votes FROM choices WHERE id = $1 AND question_id = $2")
            .bind(id)
            .bind(question_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(choice)
    }

    async fn increment_votes(&mut self, question_id: i32, id: i32) -> Result<bool, Error> {
        let res = query("UPDATE choices SET votes = votes + 1 WHERE id = $1 AND question_id = $2")
            .bind(id)
            .bind(question_id)
            .execute(&mut self.executor)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}

impl<E> Store for PgSqlx<E> where for<'e> &'e mut E: Executor<'e, Database = Postgres> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type TxStore = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
