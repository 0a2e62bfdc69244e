use crate::context::QueryError;
use log::warn;
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Typed failure of a repository operation.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unable to create row in `{table}`: {source}")]
    CreateFailed {
        table: &'static str,
        #[source]
        source: QueryError,
    },
    #[error("unable to read rows from `{table}`: {source}")]
    FetchFailed {
        table: &'static str,
        #[source]
        source: QueryError,
    },
    #[error("unable to update row in `{table}`: {source}")]
    UpdateFailed {
        table: &'static str,
        #[source]
        source: QueryError,
    },
    #[error("unable to delete rows from `{table}`: {source}")]
    DeleteFailed {
        table: &'static str,
        #[source]
        source: QueryError,
    },
    #[error("no row in `{table}` matches the given primary key")]
    NotFound { table: &'static str },
    #[error("expected at most one row in `{table}`, found several")]
    Ambiguous { table: &'static str },
    #[error(
        "connection is not initialized for repository access: expected schema version {expected_version}, got {actual_version}"
    )]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("column `{table}.{column}` does not match its declared type, nullability or default")]
    IncompatibleColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("unable to inspect schema: {0}")]
    Schema(#[source] QueryError),
}

/// Collapses a repository failure into absence.
///
/// This is the lenient "not found or failed" view for callers that cannot
/// act on the difference. The swallowed error is logged at `warn`. Results
/// that are already optional flatten with `.or_absent().flatten()`.
pub trait OrAbsent<T> {
    fn or_absent(self) -> Option<T>;
}

impl<T> OrAbsent<T> for RepoResult<T> {
    fn or_absent(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("event=repo_error_swallowed module=repo status=absent error={err}");
                None
            }
        }
    }
}
