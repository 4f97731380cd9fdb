use crate::{Effect, Msg, Orchestrator, Phase, PipelineState};

/// Pure update function: applies a message to the orchestrator and returns any effects.
pub fn update<T: Clone>(mut state: Orchestrator<T>, msg: Msg<T>) -> (Orchestrator<T>, Vec<Effect<T>>) {
    if state.is_closed() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::QuerySettled(query) => {
            let mut effects = Vec::with_capacity(2);
            // At most one fetch may be live: drop the old one before anything else.
            if let Some(request_id) = state.in_flight() {
                effects.push(Effect::CancelFetch { request_id });
                state.set_phase(Phase::Idle);
            }

            if query.is_empty() {
                state.set_published(PipelineState::Empty);
                effects.push(Effect::Publish(PipelineState::Empty));
            } else {
                let request_id = state.allocate_request_id();
                state.set_phase(Phase::Fetching {
                    request_id,
                    query: query.clone(),
                });
                effects.push(Effect::StartFetch { request_id, query });
            }
            effects
        }
        Msg::FetchSucceeded { request_id, result } => {
            if state.in_flight() != Some(request_id) {
                return (state, Vec::new());
            }
            let result = state.apply_dedup(result);
            let published = PipelineState::Ready(result);
            state.set_published(published.clone());
            state.set_phase(Phase::Idle);
            vec![Effect::Publish(published)]
        }
        Msg::FetchFailed { request_id, error } => {
            if state.in_flight() != Some(request_id) {
                return (state, Vec::new());
            }
            state.record_error(error.clone());
            let published = state.failure_state(error);
            state.set_published(published.clone());
            state.set_phase(Phase::Idle);
            vec![Effect::Publish(published)]
        }
        Msg::Shutdown => {
            let effects = match state.in_flight() {
                Some(request_id) => vec![Effect::CancelFetch { request_id }],
                None => Vec::new(),
            };
            state.set_phase(Phase::Closed);
            effects
        }
    };

    (state, effects)
}
