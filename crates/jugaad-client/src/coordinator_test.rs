use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::Semaphore;

use super::*;

type Snapshot = (String, String);

/// Waits until the view state satisfies `pred`, panicking if the fetch task
/// exits first.
async fn wait_for<T, P>(coordinator: &mut FetchCoordinator<T>, pred: P)
where
    T: Clone + Send + Sync + 'static,
    P: Fn(&ViewState<T>) -> bool,
{
    loop {
        if pred(&coordinator.state()) {
            return;
        }
        assert!(
            coordinator.state_changed().await,
            "fetch task exited before the expected state change"
        );
    }
}

fn recording_fetch(
    calls: &Arc<Mutex<Vec<Snapshot>>>,
) -> impl FnMut(Snapshot) -> futures::future::BoxFuture<'static, Result<Vec<String>, ApiError>>
       + Send
       + 'static {
    let calls = Arc::clone(calls);
    move |args: Snapshot| {
        let calls = Arc::clone(&calls);
        async move {
            calls.lock().unwrap().push(args.clone());
            Ok(vec![args.0, args.1])
        }
        .boxed()
    }
}

fn server_error() -> ApiError {
    ApiError::UnexpectedStatus {
        status: 500,
        url: "http://backend.test/get-items".to_owned(),
    }
}

#[tokio::test(start_paused = true)]
async fn no_fetch_until_all_prerequisites_resolve() {
    let (mut prereqs, rx) = Prerequisites::<String, String>::channel();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut coordinator = FetchCoordinator::spawn("items", rx, recording_fetch(&calls));

    prereqs.set_identity("uid-1".to_owned());
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(
        calls.lock().unwrap().is_empty(),
        "no fetch may be issued while location is unresolved"
    );
    assert!(coordinator.state().data.is_none());

    prereqs.set_location("682020".to_owned());
    wait_for(&mut coordinator, |state| state.data.is_some()).await;

    let calls = calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![("uid-1".to_owned(), "682020".to_owned())],
        "exactly one fetch, issued with both prerequisite values"
    );
}

#[tokio::test(start_paused = true)]
async fn value_equal_republish_does_not_refetch() {
    let (mut prereqs, rx) = Prerequisites::<String, String>::channel();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut coordinator = FetchCoordinator::spawn("items", rx, recording_fetch(&calls));

    prereqs.set_identity("uid-1".to_owned());
    prereqs.set_location("682020".to_owned());
    wait_for(&mut coordinator, |state| state.data.is_some()).await;

    // Same value again, as a re-render would produce.
    prereqs.set_location("682020".to_owned());
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn prerequisite_value_change_triggers_followup_fetch() {
    let (mut prereqs, rx) = Prerequisites::<String, String>::channel();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut coordinator = FetchCoordinator::spawn("items", rx, recording_fetch(&calls));

    prereqs.set_identity("uid-1".to_owned());
    prereqs.set_location("682020".to_owned());
    wait_for(&mut coordinator, |state| state.data.is_some()).await;

    prereqs.set_location("560001".to_owned());
    wait_for(&mut coordinator, |state| {
        state
            .data
            .as_ref()
            .is_some_and(|data| data[1] == "560001")
    })
    .await;

    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn mid_flight_updates_coalesce_into_one_followup_fetch() {
    let (mut prereqs, rx) = Prerequisites::<String, String>::channel();
    let calls: Arc<Mutex<Vec<Snapshot>>> = Arc::new(Mutex::new(Vec::new()));
    let gate = Arc::new(Semaphore::new(0));

    let fetch = {
        let calls = Arc::clone(&calls);
        let gate = Arc::clone(&gate);
        move |args: Snapshot| {
            let calls = Arc::clone(&calls);
            let gate = Arc::clone(&gate);
            async move {
                calls.lock().unwrap().push(args.clone());
                gate.acquire().await.expect("gate closed").forget();
                Ok(args.1)
            }
            .boxed()
        }
    };
    let mut coordinator = FetchCoordinator::spawn("items", rx, fetch);

    prereqs.set_identity("uid-1".to_owned());
    prereqs.set_location("pin-a".to_owned());
    wait_for(&mut coordinator, |state| state.in_flight).await;

    // Three rapid updates while the first fetch is held open.
    prereqs.set_location("pin-b".to_owned());
    prereqs.set_location("pin-c".to_owned());
    prereqs.set_location("pin-d".to_owned());

    gate.add_permits(1);
    wait_for(&mut coordinator, |state| {
        state.data.as_deref() == Some("pin-a")
    })
    .await;

    gate.add_permits(1);
    wait_for(&mut coordinator, |state| {
        state.data.as_deref() == Some("pin-d") && !state.in_flight
    })
    .await;

    let calls = calls.lock().unwrap();
    assert_eq!(
        calls.len(),
        2,
        "three mid-flight updates must coalesce into exactly one follow-up"
    );
    assert_eq!(calls[1], ("uid-1".to_owned(), "pin-d".to_owned()));
}

#[tokio::test]
async fn failure_retains_previous_data_and_emits_one_notice() {
    let (mut prereqs, rx) = Prerequisites::<String, String>::channel();
    let attempt = Arc::new(AtomicUsize::new(0));

    let fetch = {
        let attempt = Arc::clone(&attempt);
        move |_args: Snapshot| {
            let n = attempt.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Ok(vec![
                        "ghee".to_owned(),
                        "atta".to_owned(),
                        "rice".to_owned(),
                        "dal".to_owned(),
                        "milk".to_owned(),
                    ])
                } else {
                    Err(server_error())
                }
            }
            .boxed()
        }
    };
    let mut coordinator = FetchCoordinator::spawn("items", rx, fetch);

    prereqs.set_identity("uid-1".to_owned());
    prereqs.set_location("682020".to_owned());
    wait_for(&mut coordinator, |state| state.data.is_some()).await;

    prereqs.set_location("560001".to_owned());
    wait_for(&mut coordinator, |state| state.error.is_some()).await;

    let state = coordinator.state();
    let data = state.data.expect("previous data must be retained");
    assert_eq!(data.len(), 5, "transient failure must not blank the view");
    assert!(!state.in_flight);

    let notice = coordinator.try_notice().expect("one failure notice");
    assert_eq!(notice.consumer, "items");
    assert!(notice.message.contains("500"));
    assert!(
        coordinator.try_notice().is_none(),
        "exactly one notice per failed fetch"
    );
}

#[tokio::test]
async fn success_after_failure_clears_recorded_error() {
    let (prereq, rx) = Prerequisite::<String>::channel();
    let attempt = Arc::new(AtomicUsize::new(0));

    let fetch = {
        let attempt = Arc::clone(&attempt);
        move |pincode: String| {
            let n = attempt.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(server_error())
                } else {
                    Ok(pincode)
                }
            }
            .boxed()
        }
    };
    let mut coordinator = FetchCoordinator::spawn("item-detail", rx, fetch);

    prereq.set("682020".to_owned());
    wait_for(&mut coordinator, |state| state.error.is_some()).await;

    prereq.set("560001".to_owned());
    wait_for(&mut coordinator, |state| state.data.is_some()).await;
    let state = coordinator.state();
    assert_eq!(state.data.as_deref(), Some("560001"));
    assert!(state.error.is_none(), "a successful fetch clears the error");
}

#[tokio::test(start_paused = true)]
async fn single_prerequisite_gates_and_deduplicates() {
    let (prereq, rx) = Prerequisite::<String>::channel();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let fetch = {
        let calls = Arc::clone(&calls);
        move |pincode: String| {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push(pincode.clone());
                Ok(pincode)
            }
            .boxed()
        }
    };
    let mut coordinator = FetchCoordinator::spawn("item-detail", rx, fetch);

    prereq.set("682020".to_owned());
    wait_for(&mut coordinator, |state| state.data.is_some()).await;

    prereq.set("682020".to_owned());
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(*calls.lock().unwrap(), vec!["682020".to_owned()]);
}

#[tokio::test]
async fn publisher_drop_ends_fetch_task() {
    let (prereqs, rx) = Prerequisites::<String, String>::channel();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let coordinator = FetchCoordinator::spawn("items", rx, recording_fetch(&calls));

    drop(prereqs);
    for _ in 0..100 {
        if coordinator.is_finished() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert!(
        coordinator.is_finished(),
        "fetch task must exit once the publisher is dropped"
    );
    assert!(calls.lock().unwrap().is_empty());
}
