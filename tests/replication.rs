use std::collections::HashMap;

use redis_manager::error::RedisManagerError;
use redis_manager::replication::{parse_replica, replicas_from_fields, ReplicaInfo};

fn lookup<'a>(fields: &'a HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<&'static str> + 'a {
    move |name: &str| fields.get(name).copied()
}

#[test]
fn test_parse_replica_descriptor() {
    let replica = parse_replica("slave0", "ip=127.0.0.1,port=6001,state=online,offset=603,lag=1")
        .expect("parse failed");
    assert_eq!(
        replica,
        ReplicaInfo {
            ip: "127.0.0.1".to_string(),
            port: 6001,
            state: "online".to_string(),
            offset: Some(603),
            lag: Some(1),
        }
    );
}

#[test]
fn test_parse_replica_state_verbatim() {
    let replica = parse_replica("slave0", "ip=10.0.0.5,port=6380,state=wait_bgsave,offset=0,lag=0")
        .expect("parse failed");
    assert_eq!(replica.state, "wait_bgsave");
}

#[test]
fn test_parse_replica_without_offset_and_lag() {
    let replica = parse_replica("slave0", "ip=10.0.0.5,port=6380,state=online").expect("parse failed");
    assert_eq!(replica.offset, None);
    assert_eq!(replica.lag, None);
}

#[test]
fn test_parse_replica_value_containing_equals() {
    let replica = parse_replica("slave0", "ip=10.0.0.5,port=6380,state=on=line").expect("parse failed");
    assert_eq!(replica.state, "on=line");
}

#[test]
fn test_parse_replica_rejects_bad_port() {
    let err = parse_replica("slave0", "ip=10.0.0.5,port=high,state=online").unwrap_err();
    assert!(matches!(err, RedisManagerError::MalformedReplicationData(_)));
}

#[test]
fn test_parse_replica_rejects_missing_ip() {
    let err = parse_replica("slave0", "port=6380,state=online").unwrap_err();
    assert!(err.to_string().contains("'ip'"));
}

#[test]
fn test_parse_replica_rejects_legacy_format() {
    // Redis < 2.8 reported "ip,port,state" without names
    let err = parse_replica("slave0", "127.0.0.1,6001,online").unwrap_err();
    assert!(matches!(err, RedisManagerError::MalformedReplicationData(_)));
}

#[test]
fn test_fields_zero_replicas() {
    let fields = HashMap::from([("connected_slaves", "0"), ("slave0", "garbage")]);
    let replicas = replicas_from_fields(lookup(&fields)).expect("extract failed");
    assert!(replicas.is_empty());
}

#[test]
fn test_fields_reads_only_connected_count() {
    let fields = HashMap::from([
        ("connected_slaves", "1"),
        ("slave0", "ip=127.0.0.1,port=6001,state=online"),
        ("slave1", "ip=127.0.0.1,port=6002,state=online"),
    ]);
    let replicas = replicas_from_fields(lookup(&fields)).expect("extract failed");
    assert_eq!(replicas.len(), 1);
    assert_eq!(replicas[0].port, 6001);
}

#[test]
fn test_fields_non_numeric_count() {
    let fields = HashMap::from([("connected_slaves", "two")]);
    let err = replicas_from_fields(lookup(&fields)).unwrap_err();
    assert!(matches!(err, RedisManagerError::MalformedReplicationData(_)));
}

#[test]
fn test_fields_missing_count() {
    let fields = HashMap::new();
    let err = replicas_from_fields(lookup(&fields)).unwrap_err();
    assert!(err.to_string().contains("connected_slaves"));
}

#[test]
fn test_fields_missing_slave_entry() {
    let fields = HashMap::from([
        ("connected_slaves", "2"),
        ("slave1", "ip=127.0.0.1,port=6002,state=online"),
    ]);
    let err = replicas_from_fields(lookup(&fields)).unwrap_err();
    assert!(err.to_string().contains("slave0"));
}
