use serde_json::{json, Value};
use std::path::Path;

/// Metadata for the two-payload `cisa.gov` assessment.
pub fn cisa_metadata(output_directory: &Path) -> Value {
    json!({
        "assessment_id": "test",
        "domain_tested": "cisa.gov",
        "election_name": "test",
        "output_directory": output_directory,
        "payloads_meta": {
            "border_blocked": 1,
            "border_not_blocked": 1,
            "host_blocked": 1,
            "host_not_blocked": 1,
            "num_payloads": 4,
            "payloads_blocked": 2,
            "payloads_not_blocked": 2
        }
    })
}

pub fn cisa_payloads() -> Value {
    json!([
        {
            "border_protection": "Blocked",
            "C2_Protocol": "test_protocol",
            "host_protection": "Not blocked",
            "Payload": "test_payload_1"
        },
        {
            "border_protection": "Not blocked",
            "C2_Protocol": "test_protocol",
            "host_protection": "Blocked",
            "Payload": "test_payload_2"
        }
    ])
}

const DESCRIPTION: &str =
    "Simulated command and control beacon sent over an allowed egress channel";

/// `count` payloads alternating between blocked and not blocked, with
/// enough text per row to push the detail table over several pages.
pub fn many_payloads(count: usize) -> Value {
    let payloads: Vec<Value> = (0..count)
        .map(|i| {
            let (border, host) = if i % 2 == 0 {
                ("Blocked", "Not blocked")
            } else {
                ("Not blocked", "Blocked")
            };
            let protocol = ["https", "dns", "smb"][i % 3];
            json!({
                "border_protection": border,
                "C2_Protocol": protocol,
                "host_protection": host,
                "Payload": format!("payload_{i:03}"),
                "payload_description": DESCRIPTION,
            })
        })
        .collect();
    Value::Array(payloads)
}

pub fn metadata_for(output_directory: &Path, payload_count: u64) -> Value {
    let border_blocked = payload_count.div_ceil(2);
    let host_blocked = payload_count / 2;
    json!({
        "assessment_id": "bulk",
        "domain_tested": "elections.example.gov",
        "election_name": "General",
        "output_directory": output_directory,
        "payloads_meta": {
            "border_blocked": border_blocked,
            "border_not_blocked": payload_count - border_blocked,
            "host_blocked": host_blocked,
            "host_not_blocked": payload_count - host_blocked,
            "num_payloads": payload_count * 2,
            "payloads_blocked": border_blocked + host_blocked,
            "payloads_not_blocked": payload_count * 2 - border_blocked - host_blocked
        }
    })
}
