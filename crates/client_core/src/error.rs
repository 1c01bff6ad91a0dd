use thiserror::Error;

/// Failure taxonomy for catalogue queries. Transport problems, endpoint-
/// reported query errors, unusable response bodies, and logical absence
/// of a requested variable are distinct outcomes; zero matching records
/// on a list query is a valid empty result and never an error.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("transport failure during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation} rejected by endpoint: {message}")]
    Query {
        operation: &'static str,
        message: String,
    },

    #[error("malformed response for {operation}: {message}")]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },

    #[error("no variable named '{name}' in release {release}")]
    VariableNotFound { name: String, release: String },

    #[error("invalid catalogue endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
