use thiserror::Error;

#[derive(Debug, Error)]
pub enum BioError {
    #[error("no preset registered under key `{key}`")]
    NotFound { key: String },

    #[error("a preset registry needs at least one preset")]
    EmptyRegistry,

    #[error("preset key `{key}` is registered more than once")]
    DuplicateKey { key: String },

    #[error("preset `{key}` declares neither `panels` nor `widgets`")]
    MissingContent { key: String },

    #[error("malformed `{kind}` widget payload: {source}")]
    InvalidWidget {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed preset data: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T, E = BioError> = std::result::Result<T, E>;
