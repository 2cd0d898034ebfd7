use serde_json::json;

use super::message::{ErrorEnvelope, KeyGenRequest, KeyGenResponse, Link, MeResponse};
use super::topic::{ChannelOption, QoS, format_topic};
use super::{ERROR_PREFIX, KEYGEN_PREFIX, SERVICE_ROOT};

#[test]
fn test_format_topic_key_and_channel() {
    assert_eq!(format_topic("key", "chat", &[]), "key/chat/");
}

#[test]
fn test_format_topic_without_key_omits_segment() {
    assert_eq!(format_topic("", "chat", &[]), "chat/");
}

#[test]
fn test_format_topic_trims_surrounding_slashes() {
    assert_eq!(format_topic("/key/", "/chat/room/", &[]), "key/chat/room/");
}

#[test]
fn test_format_topic_with_options() {
    assert_eq!(
        format_topic("key", "chat", &[ChannelOption::Ttl(30)]),
        "key/chat/?ttl=30"
    );
    assert_eq!(
        format_topic("key", "chat", &[ChannelOption::Ttl(30), ChannelOption::Last(5)]),
        "key/chat/?ttl=30&last=5"
    );
}

#[test]
fn test_channel_option_display() {
    assert_eq!(ChannelOption::Ttl(60).to_string(), "ttl=60");
    assert_eq!(ChannelOption::Last(10).to_string(), "last=10");
}

#[test]
fn test_qos_wire_values() {
    assert_eq!(QoS::AtMostOnce.as_u8(), 0);
    assert_eq!(QoS::AtLeastOnce.as_u8(), 1);
    assert_eq!(QoS::from(0), QoS::AtMostOnce);
    assert_eq!(QoS::from(1), QoS::AtLeastOnce);
}

#[test]
fn test_service_prefixes_share_the_reserved_root() {
    assert!(ERROR_PREFIX.starts_with(SERVICE_ROOT));
    assert!(KEYGEN_PREFIX.starts_with(SERVICE_ROOT));
}

#[test]
fn test_keygen_request_renames_permissions_field() {
    let body = serde_json::to_value(&KeyGenRequest {
        key: "master".to_string(),
        channel: "chat/".to_string(),
        permissions: "rwls".to_string(),
        ttl: 0,
    })
    .unwrap();
    assert_eq!(body["type"], "rwls");
    assert!(body.get("permissions").is_none());
}

#[test]
fn test_responses_decode_leniently() {
    // Missing fields default rather than fail, as the service encodes sparsely.
    let resp: KeyGenResponse = serde_json::from_value(json!({ "req": 7, "key": "abc" })).unwrap();
    assert_eq!(resp.req, 7);
    assert_eq!(resp.key, "abc");
    assert_eq!(resp.status, 0);

    let me: MeResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(me.req, 0);
    assert!(me.id.is_empty());
}

#[test]
fn test_error_envelope_with_empty_message_is_not_an_error() {
    // A success payload also decodes as an envelope; the empty message is
    // what distinguishes it.
    let env: ErrorEnvelope =
        serde_json::from_value(json!({ "req": 3, "status": 200, "key": "abc" })).unwrap();
    assert!(env.message.is_empty());

    let env: ErrorEnvelope =
        serde_json::from_value(json!({ "req": 3, "status": 400, "message": "bad request" }))
            .unwrap();
    assert_eq!(env.message, "bad request");
}

#[test]
fn test_link_decodes_channel() {
    let link: Link =
        serde_json::from_value(json!({ "req": 2, "name": "a0", "channel": "chat/" })).unwrap();
    assert_eq!(link.name, "a0");
    assert_eq!(link.channel, "chat/");
}
