//! ---
//! courier_section: "15-testing-qa-runbook"
//! courier_subsection: "integration-tests"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Integration and validation tests for the courier stack."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use courier_common::CourierConfig;
use courier_queue::{DataMsg, Msg, MsgUid, Queue};

const PING: i32 = 1;
const READING: i32 = 2;
const SHUTDOWN: i32 = 3;
const ACK: i32 = 10;

fn queue_from(toml: &str) -> Queue {
    courier_common::init();
    let config: CourierConfig = toml.parse().expect("valid config");
    Queue::with_config(&config.queue)
}

#[test]
fn configured_queue_serves_mixed_traffic() {
    let queue = Arc::new(queue_from(
        r#"
        [queue]
        name = "plant-bus"
        request_timeout_ms = 10000
        "#,
    ));
    assert_eq!(queue.name(), "plant-bus");

    let worker = {
        let queue = Arc::clone(&queue);
        std::thread::spawn(move || {
            let mut readings = Vec::new();
            loop {
                let envelope = queue.get(Duration::ZERO).expect("blocking get");
                match envelope.msg_id() {
                    PING => {
                        let echoed = envelope.payload::<String>().cloned().unwrap_or_default();
                        assert!(queue.respond_to(envelope.unique_id(), DataMsg::new(ACK, echoed)));
                    }
                    READING => {
                        let value = envelope.into_payload::<f64>().expect("f64 reading");
                        readings.push(value);
                    }
                    SHUTDOWN => break readings,
                    other => panic!("unexpected discriminator {other}"),
                }
            }
        })
    };

    queue.put(DataMsg::new(READING, 49.98_f64));
    let ack = queue
        .request_default(DataMsg::new(PING, String::from("hello")))
        .expect("worker answers ping");
    assert_eq!(ack.msg_id(), ACK);
    assert_eq!(ack.payload::<String>().map(String::as_str), Some("hello"));
    queue.put(DataMsg::new(READING, 50.02_f64));
    queue.put(Msg::new(SHUTDOWN));

    let readings = worker.join().expect("worker thread");
    assert_eq!(readings, [49.98, 50.02]);
    assert_eq!(queue.pending_requests(), 0);
    assert!(queue.is_empty());
}

#[test]
fn unique_ids_stay_unique_through_the_queue() {
    let queue = queue_from("");
    let per_producer = 1000;

    let seen: HashSet<MsgUid> = std::thread::scope(|scope| {
        for _ in 0..2 {
            scope.spawn(|| {
                for _ in 0..per_producer {
                    queue.put(Msg::new(0));
                }
            });
        }
        (0..2 * per_producer)
            .map(|_| queue.get(Duration::ZERO).expect("blocking get").unique_id())
            .collect()
    });

    assert_eq!(seen.len(), 2 * per_producer);
}

#[test]
fn configured_request_timeout_expires_without_losing_request() {
    let queue = queue_from("[queue]\nrequest_timeout_ms = 25\nget_timeout_ms = 25\n");

    assert!(queue.request_default(Msg::new(PING)).is_none());
    let request = queue.get_default().expect("request still queued");
    assert_eq!(request.msg_id(), PING);
    assert!(!queue.respond_to(request.unique_id(), Msg::new(ACK)));
    assert!(queue.get_default().is_none());

    let stats = queue.stats();
    assert_eq!(stats.requests, 1);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.unmatched, 1);
}
