use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    /// A UNIQUE/CHECK/FK constraint rejected the statement. Callers map
    /// this to a domain conflict instead of sniffing message strings.
    #[error("constraint violation: {0}")]
    Constraint(String),
}
