//! ---
//! courier_section: "05-operator-tooling"
//! courier_subsection: "binary"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Control CLI for exercising courier queues."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use courier_queue::{DataMsg, Queue, QueueStats};
use serde::Serialize;
use tracing::{debug, info, warn};

const RESPONDER_POLL: Duration = Duration::from_millis(50);

/// Outcome of a many-producers, one-consumer run.
#[derive(Debug, Serialize)]
pub struct FanInReport {
    pub producers: usize,
    pub messages_per_producer: usize,
    pub delivered: usize,
    pub out_of_order: usize,
    pub elapsed_ms: f64,
    pub messages_per_sec: f64,
    pub stats: QueueStats,
}

/// Outcome of a many-requesters, one-responder run.
#[derive(Debug, Serialize)]
pub struct PingPongReport {
    pub requesters: usize,
    pub requests_per_requester: usize,
    pub answered: usize,
    pub expired: usize,
    pub mismatched: usize,
    pub elapsed_ms: f64,
    pub round_trips_per_sec: f64,
    pub stats: QueueStats,
}

fn producer_tag(index: usize) -> Result<i32> {
    i32::try_from(index).map_err(|_| anyhow!("too many workers: {}", index))
}

fn per_second(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Every producer puts `messages` sequence numbers tagged with its index; a
/// single consumer drains them and checks each producer's order.
pub fn run_fan_in(queue: &Queue, producers: usize, messages: usize) -> Result<FanInReport> {
    let tags = (0..producers)
        .map(producer_tag)
        .collect::<Result<Vec<_>>>()?;
    info!(queue = queue.name(), producers, messages, "fan-in scenario starting");
    let start = Instant::now();

    let (delivered, out_of_order) = thread::scope(|scope| {
        for &tag in &tags {
            scope.spawn(move || {
                for sequence in 0..messages {
                    queue.put(DataMsg::new(tag, sequence));
                }
            });
        }

        let mut next = vec![0_usize; producers];
        let mut delivered = 0_usize;
        let mut out_of_order = 0_usize;
        for _ in 0..producers * messages {
            let Some(envelope) = queue.get(Duration::ZERO) else {
                break;
            };
            delivered += 1;
            let slot = usize::try_from(envelope.msg_id())
                .ok()
                .filter(|slot| *slot < producers);
            match (slot, envelope.payload::<usize>()) {
                (Some(slot), Some(&sequence)) if sequence == next[slot] => next[slot] += 1,
                (Some(slot), Some(&sequence)) => {
                    warn!(producer = slot, expected = next[slot], sequence, "out of order delivery");
                    out_of_order += 1;
                    next[slot] = sequence + 1;
                }
                _ => {
                    warn!(msg_id = envelope.msg_id(), "unexpected envelope in fan-in run");
                    out_of_order += 1;
                }
            }
        }
        (delivered, out_of_order)
    });

    let elapsed = start.elapsed();
    Ok(FanInReport {
        producers,
        messages_per_producer: messages,
        delivered,
        out_of_order,
        elapsed_ms: elapsed.as_secs_f64() * 1_000.0,
        messages_per_sec: per_second(delivered, elapsed),
        stats: queue.stats(),
    })
}

fn expected_answer(value: u64) -> u64 {
    value.wrapping_mul(2).wrapping_add(1)
}

/// Each requester sends `requests` numbered requests and checks that every
/// answer was computed from its own request. One responder serves them all.
pub fn run_ping_pong(
    queue: &Queue,
    requesters: usize,
    requests: usize,
    timeout: Duration,
) -> Result<PingPongReport> {
    let tags = (0..requesters)
        .map(producer_tag)
        .collect::<Result<Vec<_>>>()?;
    info!(
        queue = queue.name(),
        requesters,
        requests,
        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        "ping-pong scenario starting"
    );
    let done = AtomicBool::new(false);
    let start = Instant::now();

    let outcomes = thread::scope(|scope| {
        scope.spawn(|| serve_requests(queue, &done));

        let workers: Vec<_> = tags
            .iter()
            .map(|&tag| {
                scope.spawn(move || {
                    let mut outcome = RequesterOutcome::default();
                    for index in 0..requests {
                        let value = (u64::from(tag.unsigned_abs()) << 32) | index as u64;
                        match queue.request(DataMsg::new(tag, value), timeout) {
                            Some(response)
                                if response.msg_id() == tag
                                    && response.payload::<u64>() == Some(&expected_answer(value)) =>
                            {
                                outcome.answered += 1;
                            }
                            Some(response) => {
                                warn!(requester = tag, msg_id = response.msg_id(), "mismatched response");
                                outcome.mismatched += 1;
                            }
                            None => outcome.expired += 1,
                        }
                    }
                    outcome
                })
            })
            .collect();

        let joined: Vec<_> = workers.into_iter().map(|worker| worker.join()).collect();
        // The responder only stops once every requester is done.
        done.store(true, Ordering::Release);
        joined
            .into_iter()
            .map(|outcome| outcome.map_err(|_| anyhow!("requester thread panicked")))
            .collect::<Result<Vec<RequesterOutcome>>>()
    })?;

    let elapsed = start.elapsed();
    let answered: usize = outcomes.iter().map(|o| o.answered).sum();
    Ok(PingPongReport {
        requesters,
        requests_per_requester: requests,
        answered,
        expired: outcomes.iter().map(|o| o.expired).sum(),
        mismatched: outcomes.iter().map(|o| o.mismatched).sum(),
        elapsed_ms: elapsed.as_secs_f64() * 1_000.0,
        round_trips_per_sec: per_second(answered, elapsed),
        stats: queue.stats(),
    })
}

#[derive(Debug, Default)]
struct RequesterOutcome {
    answered: usize,
    expired: usize,
    mismatched: usize,
}

/// Answer requests until `done` is set and the queue has gone quiet.
fn serve_requests(queue: &Queue, done: &AtomicBool) {
    loop {
        match queue.get(RESPONDER_POLL) {
            Some(request) => {
                let Some(&value) = request.payload::<u64>() else {
                    debug!(msg_id = request.msg_id(), "ignoring non-request envelope");
                    continue;
                };
                let answer = DataMsg::new(request.msg_id(), expected_answer(value));
                if !queue.respond_to(request.unique_id(), answer) {
                    debug!(uid = %request.unique_id(), "requester gave up before the answer");
                }
            }
            None if done.load(Ordering::Acquire) => break,
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_in_sees_every_message_in_order() {
        let queue = Queue::named("fan-in-test");
        let report = run_fan_in(&queue, 3, 200).expect("fan-in run");
        assert_eq!(report.delivered, 600);
        assert_eq!(report.out_of_order, 0);
        assert_eq!(report.stats.put, 600);
        assert!(queue.is_empty());
    }

    #[test]
    fn ping_pong_answers_every_request() {
        let queue = Queue::named("ping-pong-test");
        let report =
            run_ping_pong(&queue, 3, 100, Duration::from_secs(30)).expect("ping-pong run");
        assert_eq!(report.answered, 300);
        assert_eq!(report.expired, 0);
        assert_eq!(report.mismatched, 0);
        assert_eq!(queue.pending_requests(), 0);
    }

    #[test]
    fn report_serializes_to_json() {
        let queue = Queue::new();
        let report = run_fan_in(&queue, 1, 5).expect("fan-in run");
        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["delivered"], 5);
        assert_eq!(json["stats"]["delivered"], 5);
    }
}
