use envipath_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("pathway {0} has no root node")]
    NoRoot(String),

    /// The service had not finished predicting when the poll budget ran out.
    #[error("prediction {pathway} still incomplete after {polls} polls")]
    PredictionIncomplete { pathway: String, polls: u32 },
}

pub type Result<T> = std::result::Result<T, EvalError>;
