use crate::serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

impl DeleteResponse {
    pub fn new(deleted: u64) -> Self {
        DeleteResponse { deleted }
    }
}
