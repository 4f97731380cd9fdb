use crate::{PipelineState, Query, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect<T> {
    StartFetch { request_id: RequestId, query: Query },
    CancelFetch { request_id: RequestId },
    Publish(PipelineState<T>),
}
