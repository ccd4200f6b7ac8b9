//! ---
//! courier_section: "02-messaging-data-model"
//! courier_subsection: "integration-tests"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Message envelopes and unique id generation."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::collections::BTreeMap;
use std::sync::mpsc;

use courier_msg::{DataMsg, Envelope, Message, Msg, MsgUid};

fn assert_send<T: Send>() {}

#[test]
fn envelopes_can_cross_threads() {
    assert_send::<Envelope>();
    assert_send::<DataMsg<String>>();
}

#[test]
fn envelope_changes_owner_across_thread_boundary() {
    let (tx, rx) = mpsc::channel::<Envelope>();
    let mut readings = BTreeMap::new();
    readings.insert("voltage".to_string(), 418.2_f64);
    let sent = DataMsg::new(11, readings.clone());
    let uid = sent.unique_id();

    let consumer = std::thread::spawn(move || {
        let mut envelope = rx.recv().expect("envelope delivered");
        envelope
            .payload_mut::<BTreeMap<String, f64>>()
            .expect("map payload")
            .insert("current".to_string(), 12.4);
        envelope
    });

    tx.send(Envelope::from(sent)).expect("consumer alive");
    let envelope = consumer.join().expect("consumer thread");

    assert_eq!(envelope.unique_id(), uid);
    let received = envelope
        .into_payload::<BTreeMap<String, f64>>()
        .expect("map payload");
    assert_eq!(received.len(), readings.len() + 1);
    assert_eq!(received.get("voltage"), readings.get("voltage"));
}

#[test]
fn mixed_variants_share_one_stream() {
    let envelopes: Vec<Envelope> = vec![
        Msg::new(1).into(),
        DataMsg::new(2, 5_u64).into(),
        DataMsg::new(3, "text").into(),
    ];

    let ids: Vec<MsgUid> = envelopes.iter().map(Envelope::unique_id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));

    let kinds: Vec<&'static str> = envelopes
        .iter()
        .map(|envelope| {
            if envelope.is::<Msg>() {
                "bare"
            } else if envelope.payload::<u64>().is_some() {
                "u64"
            } else if envelope.payload::<&'static str>().is_some() {
                "str"
            } else {
                "unknown"
            }
        })
        .collect();
    assert_eq!(kinds, ["bare", "u64", "str"]);
}
