use std::time::Duration;

use super::PendingRequests;
use crate::protocol::{MeResponse, ServiceReply};
use crate::utils::Error;

fn me_reply(req: u16, id: &str) -> ServiceReply {
    ServiceReply::Me(MeResponse {
        req,
        id: id.to_string(),
        key: String::new(),
    })
}

#[tokio::test]
async fn test_put_then_notify_delivers_value() {
    let store = PendingRequests::new();
    let rx = store.put(7);

    assert!(store.notify(7, Ok(me_reply(7, "abc"))));

    match rx.await.unwrap() {
        Ok(ServiceReply::Me(me)) => assert_eq!(me.id, "abc"),
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[tokio::test]
async fn test_second_notify_returns_false() {
    let store = PendingRequests::new();
    let rx = store.put(7);

    assert!(store.notify(7, Ok(me_reply(7, "first"))));
    assert!(!store.notify(7, Ok(me_reply(7, "second"))));

    match rx.await.unwrap() {
        Ok(ServiceReply::Me(me)) => assert_eq!(me.id, "first"),
        other => panic!("unexpected reply: {other:?}"),
    }
}

#[test]
fn test_notify_unknown_id_returns_false() {
    let store = PendingRequests::new();
    assert!(!store.notify(42, Ok(me_reply(42, "x"))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_notify_after_discard_returns_false() {
    let store = PendingRequests::new();
    let rx = store.put(9);

    store.discard(9);
    assert!(!store.notify(9, Ok(me_reply(9, "late"))));
    assert!(rx.await.is_err());
}

#[tokio::test]
async fn test_notify_after_receiver_dropped_returns_false() {
    let store = PendingRequests::new();
    let rx = store.put(9);
    drop(rx);

    // Slot still registered but the waiter is gone; the value is discarded.
    assert!(!store.notify(9, Ok(me_reply(9, "late"))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_notify_delivers_error_result() {
    let store = PendingRequests::new();
    let rx = store.put(3);

    assert!(store.notify(
        3,
        Err(Error::Service {
            status: 401,
            message: "unauthorized".to_string(),
        }),
    ));

    match rx.await.unwrap() {
        Err(Error::Service { status, .. }) => assert_eq!(status, 401),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_interleaved_replies_reach_their_own_callers() {
    let store = PendingRequests::new();
    let rx_a = store.put(101);
    let rx_b = store.put(102);

    // 102's reply arrives before 101's.
    assert!(store.notify(102, Ok(me_reply(102, "b"))));
    assert!(store.notify(101, Ok(me_reply(101, "a"))));

    match rx_a.await.unwrap() {
        Ok(reply) => assert_eq!(reply.request_id(), 101),
        other => panic!("unexpected result: {other:?}"),
    }
    match rx_b.await.unwrap() {
        Ok(reply) => assert_eq!(reply.request_id(), 102),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_waiter_times_out_when_slot_never_filled() {
    let store = PendingRequests::new();
    let rx = store.put(5);

    let waited = tokio::time::timeout(Duration::from_millis(50), rx).await;
    assert!(waited.is_err());

    // The caller abandons the slot after the timeout.
    store.discard(5);
    assert!(!store.notify(5, Ok(me_reply(5, "late"))));
}
