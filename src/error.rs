#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("element `{element_id}` has type `{element_type}` with no display mapping")]
    UnknownElementType {
        element_id: String,
        element_type: String,
    },
    #[error("no snapshot with id `{0}`")]
    UnknownSnapshot(String),
    #[error("history storage failed for key `{key}`: {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("history data for key `{key}` is not valid JSON: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
