use crate::core::models::{
    choice::{Choice, Insert as ChoiceInsert, Query as ChoiceQuery},
    common::Pagination,
    question::{Insert as QuestionInsert, Query as QuestionQuery, Question},
};
use crate::core::ports::repository::{ChoiceCommon, Manager, QuestionCommon, Store, TxStore};
use crate::error::Error;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
struct Tables {
    questions: BTreeMap<i32, Question>,
    choices: BTreeMap<i32, Choice>,
    question_seq: i32,
    choice_seq: i32,
}

/// In-process store, every operation runs under one lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryManager {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Manager for MemoryManager {
    type Store = MemoryStore;
    type TxStore = MemoryStore;

    async fn db(&self) -> Result<Self::Store, Error> {
        Ok(MemoryStore {
            tables: self.tables.clone(),
            journal: None,
        })
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        Ok(MemoryStore {
            tables: self.tables.clone(),
            journal: Some(Vec::new()),
        })
    }
}

/// One write made inside a transaction, with what is needed to take it back.
#[derive(Debug)]
enum Undo {
    QuestionInserted(i32),
    ChoiceInserted(i32),
    QuestionDeleted(Question, Vec<Choice>),
    VoteAdded(i32),
}

impl Undo {
    fn apply(self, tables: &mut Tables) {
        match self {
            Undo::QuestionInserted(id) => {
                tables.questions.remove(&id);
                tables.choices.retain(|_, c| c.question_id != id);
            }
            Undo::ChoiceInserted(id) => {
                tables.choices.remove(&id);
            }
            Undo::QuestionDeleted(question, choices) => {
                tables.questions.insert(question.id, question);
                tables.choices.extend(choices.into_iter().map(|c| (c.id, c)));
            }
            Undo::VoteAdded(id) => {
                if let Some(choice) = tables.choices.get_mut(&id) {
                    choice.votes -= 1;
                }
            }
        }
    }
}

/// A handle on the shared tables. When opened as a transaction it journals
/// its own writes and takes them back, newest first, unless committed.
/// Writes made through other handles are never touched, and ids handed out
/// by the sequences are not reused.
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    journal: Option<Vec<Undo>>,
}

fn lock(tables: &Arc<Mutex<Tables>>) -> Result<MutexGuard<'_, Tables>, Error> {
    tables.lock().map_err(|e| Error::ServerError(format!("memory store poisoned: {}", e)))
}

fn record(journal: &mut Option<Vec<Undo>>, undo: Undo) {
    if let Some(journal) = journal {
        journal.push(undo);
    }
}

impl MemoryStore {
    fn undo(&mut self) -> Result<(), Error> {
        if let Some(journal) = self.journal.take() {
            let mut tables = lock(&self.tables)?;
            for undo in journal.into_iter().rev() {
                undo.apply(&mut tables);
            }
        }
        Ok(())
    }
}

impl QuestionCommon for MemoryStore {
    async fn insert(&mut self, question: QuestionInsert) -> Result<i32, Error> {
        let mut tables = lock(&self.tables)?;
        tables.question_seq += 1;
        let id = tables.question_seq;
        tables.questions.insert(
            id,
            Question {
                id,
                question_text: question.question_text,
                pub_date: question.pub_date,
            },
        );
        record(&mut self.journal, Undo::QuestionInserted(id));
        Ok(id)
    }

    async fn query(&mut self, query: QuestionQuery, pagination: Option<Pagination>) -> Result<Vec<Question>, Error> {
        let tables = lock(&self.tables)?;
        let mut questions: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| query.pub_date_le.map_or(true, |le| q.pub_date <= le))
            .cloned()
            .collect();
        questions.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        if let Some(Pagination { limit, offset }) = pagination {
            let offset = offset.unwrap_or(0).max(0) as usize;
            questions = questions.into_iter().skip(offset).take(limit.max(0) as usize).collect();
        }
        Ok(questions)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Question>, Error> {
        Ok(lock(&self.tables)?.questions.get(&id).cloned())
    }

    async fn delete(&mut self, id: i32) -> Result<u64, Error> {
        let mut tables = lock(&self.tables)?;
        let question = match tables.questions.remove(&id) {
            Some(question) => question,
            None => return Ok(0),
        };
        let choice_ids: Vec<i32> = tables.choices.values().filter(|c| c.question_id == id).map(|c| c.id).collect();
        let choices = choice_ids.iter().filter_map(|cid| tables.choices.remove(cid)).collect();
        record(&mut self.journal, Undo::QuestionDeleted(question, choices));
        Ok(1)
    }
}

impl ChoiceCommon for MemoryStore {
    async fn insert(&mut self, choice: ChoiceInsert) -> Result<i32, Error> {
        let mut tables = lock(&self.tables)?;
        if !tables.questions.contains_key(&choice.question_id) {
            return Err(Error::BusinessError(format!("question {} does not exist", choice.question_id)));
        }
        tables.choice_seq += 1;
        let id = tables.choice_seq;
        tables.choices.insert(
            id,
            Choice {
                id,
                question_id: choice.question_id,
                choice_text: choice.choice_text,
                votes: 0,
            },
        );
        record(&mut self.journal, Undo::ChoiceInserted(id));
        Ok(id)
    }

    async fn query(&mut self, query: ChoiceQuery) -> Result<Vec<Choice>, Error> {
        let tables = lock(&self.tables)?;
        Ok(tables
            .choices
            .values()
            .filter(|c| query.question_id_eq.map_or(true, |qid| c.question_id == qid))
            .cloned()
            .collect())
    }

    async fn get(&mut self, question_id: i32, id: i32) -> Result<Option<Choice>, Error> {
        Ok(lock(&self.tables)?.choices.get(&id).filter(|c| c.question_id == question_id).cloned())
    }

    async fn increment_votes(&mut self, question_id: i32, id: i32) -> Result<bool, Error> {
        let mut tables = lock(&self.tables)?;
        match tables.choices.get_mut(&id) {
            Some(choice) if choice.question_id == question_id => {
                choice.votes += 1;
                record(&mut self.journal, Undo::VoteAdded(id));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        self.journal = None;
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), Error> {
        self.undo()
    }
}

impl Drop for MemoryStore {
    fn drop(&mut self) {
        if let Err(e) = self.undo() {
            log::error!("failed to discard uncommitted writes: {}", e);
        }
    }
}
