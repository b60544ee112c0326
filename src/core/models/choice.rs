use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    pub choice_text: String,
    pub votes: i32,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.choice_text)
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_id: i32,
    pub choice_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub question_id_eq: Option<i32>,
}
