use std::sync::{Arc, Mutex};

use forecast_core::{PipelineState, StatePublisher};

type Seen = Arc<Mutex<Vec<PipelineState<u32>>>>;

fn recorder(seen: &Seen) -> impl FnMut(&PipelineState<u32>) + Send + 'static {
    let seen = seen.clone();
    move |state| seen.lock().unwrap().push(state.clone())
}

#[test]
fn new_subscriber_gets_current_state_immediately() {
    let mut publisher = StatePublisher::new();
    publisher.publish(PipelineState::Ready(7));

    let seen: Seen = Arc::default();
    publisher.subscribe(recorder(&seen));

    assert_eq!(*seen.lock().unwrap(), vec![PipelineState::Ready(7)]);
}

#[test]
fn first_subscriber_sees_initial_empty() {
    let mut publisher = StatePublisher::<u32>::new();
    let seen: Seen = Arc::default();
    publisher.subscribe(recorder(&seen));

    assert_eq!(*seen.lock().unwrap(), vec![PipelineState::Empty]);
}

#[test]
fn every_observer_sees_every_state_in_order() {
    let mut publisher = StatePublisher::new();
    let first: Seen = Arc::default();
    let second: Seen = Arc::default();
    publisher.subscribe(recorder(&first));

    publisher.publish(PipelineState::Ready(1));
    publisher.subscribe(recorder(&second));
    publisher.publish(PipelineState::Empty);
    publisher.publish(PipelineState::Ready(2));

    assert_eq!(
        *first.lock().unwrap(),
        vec![
            PipelineState::Empty,
            PipelineState::Ready(1),
            PipelineState::Empty,
            PipelineState::Ready(2),
        ]
    );
    assert_eq!(
        *second.lock().unwrap(),
        vec![
            PipelineState::Ready(1),
            PipelineState::Empty,
            PipelineState::Ready(2),
        ]
    );
}

#[test]
fn unsubscribed_observer_stops_receiving() {
    let mut publisher = StatePublisher::new();
    let seen: Seen = Arc::default();
    let id = publisher.subscribe(recorder(&seen));

    assert!(publisher.unsubscribe(id));
    assert!(!publisher.unsubscribe(id));
    publisher.publish(PipelineState::Ready(3));

    assert_eq!(*seen.lock().unwrap(), vec![PipelineState::Empty]);
    assert_eq!(publisher.observer_count(), 0);
    assert_eq!(publisher.current(), &PipelineState::Ready(3));
}

#[test]
fn clear_releases_all_observers() {
    let mut publisher = StatePublisher::<u32>::new();
    let seen: Seen = Arc::default();
    publisher.subscribe(recorder(&seen));
    publisher.subscribe(recorder(&seen));
    assert_eq!(publisher.observer_count(), 2);

    publisher.clear();
    publisher.publish(PipelineState::Ready(9));

    assert_eq!(publisher.observer_count(), 0);
    assert_eq!(seen.lock().unwrap().len(), 2);
}
