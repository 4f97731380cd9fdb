use crate::{FetchError, Query, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg<T> {
    /// A query became final (quiet window elapsed, or a direct refresh).
    QuerySettled(Query),
    /// A fetch resolved with a result.
    FetchSucceeded { request_id: RequestId, result: T },
    /// A fetch resolved with an error.
    FetchFailed {
        request_id: RequestId,
        error: FetchError,
    },
    /// The owning host is going away.
    Shutdown,
}
