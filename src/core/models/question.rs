use crate::core::models::choice::Choice;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// Whether `pub_date` lies within the day before `now`, both ends inclusive.
    /// A question dated in the future is not recent.
    pub fn was_published_recently_at(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.pub_date && self.pub_date <= now
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.question_text)
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionCreate {
    pub question_text: String,
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub pub_date_le: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub was_published_recently: bool,
}

impl QuestionSummary {
    pub fn new(question: Question, now: DateTime<Utc>) -> Self {
        let was_published_recently = question.was_published_recently_at(now);
        Self {
            id: question.id,
            question_text: question.question_text,
            pub_date: question.pub_date,
            was_published_recently,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub latest_question_list: Vec<QuestionSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    pub question: Question,
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResults {
    pub question: Question,
    pub choices: Vec<Choice>,
    pub total_votes: i64,
}

impl QuestionResults {
    pub fn new(question: Question, choices: Vec<Choice>) -> Self {
        let total_votes = choices.iter().map(|c| i64::from(c.votes)).sum();
        Self { question, choices, total_votes }
    }
}
