use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Invalid render tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TreeResult<T> = Result<T, TreeError>;
