#![cfg(feature = "serde")]

use lmkdprims_packet::{LmkTarget, LmkdMessage, ProcPrio, ProcType, ProcsPrio, TargetList};

#[test]
fn message_json_shape() {
    let message = LmkdMessage::ProcPrio(ProcPrio {
        pid: 1234,
        uid: 10001,
        oomadj: 900,
        ptype: ProcType::Service,
    });
    let json = serde_json::to_value(&message).unwrap();

    assert_eq!(json["type"], "proc_prio");
    assert_eq!(json["payload"]["pid"], 1234);
    assert_eq!(json["payload"]["ptype"], "service");
}

#[test]
fn bounded_lists_serialize_as_arrays() {
    let targets = TargetList::from_slice(&[LmkTarget::new(18432, 0)]).unwrap();
    let json = serde_json::to_string(&LmkdMessage::Target(targets)).unwrap();
    assert_eq!(
        json,
        r#"{"type":"target","payload":[{"minfree":18432,"oom_adj_score":0}]}"#
    );

    let decoded: LmkdMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, LmkdMessage::Target(targets));
}

#[test]
fn oversized_lists_fail_to_deserialize() {
    let procs = vec![ProcPrio::default(); 4];
    let json = serde_json::to_string(&procs).unwrap();
    assert!(serde_json::from_str::<ProcsPrio>(&json).is_err());
    assert!(serde_json::from_str::<ProcsPrio>("[]").is_err());
}

#[test]
fn unit_messages_have_no_payload() {
    let json = serde_json::to_string(&LmkdMessage::ProcPurge).unwrap();
    assert_eq!(json, r#"{"type":"proc_purge"}"#);
}
