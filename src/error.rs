use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown scene `{0}`")]
    UnknownScene(String),
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("dom: {0}")]
    Dom(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
