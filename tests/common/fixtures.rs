//! Static corpora used across harnesses.
//!
//! Sheet grids are written the way the Sheets `values` endpoint returns them
//! with `FORMATTED_VALUE`: every cell a string, short rows truncated.

use serde_json::{json, Value};

/// RSA key used to sign service-account assertions in tests.
pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/service_account_key.pem");
/// Public half of [`TEST_PRIVATE_KEY`], used by the fake token endpoint.
pub const TEST_PUBLIC_KEY: &str = include_str!("../fixtures/service_account_pub.pem");

pub const TEST_CLIENT_EMAIL: &str = "sqm-bot@sqm-test.iam.gserviceaccount.com";

/// A service-account key file whose `token_uri` points at `token_uri`.
pub fn service_account_json(token_uri: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": "sqm-test",
        "private_key_id": "0123456789abcdef",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": TEST_CLIENT_EMAIL,
        "client_id": "1000000000000",
        "token_uri": token_uri,
    })
    .to_string()
}

/// The SQM sheet as the API returns it: un-normalised header, mixed statuses,
/// a non-numeric age, a short row and markup in a summary.
pub fn sqm_grid() -> Vec<Vec<Value>> {
    vec![
        vec![
            json!(" INCIDENT "),
            json!("Status"),
            json!("UMUR TIKET"),
            json!("Customer Type"),
            json!("STO"),
            json!("Summary"),
        ],
        vec![json!("INC100"), json!("OPEN"), json!("5"), json!("CONSUMER"), json!("BDG"), json!("No dial tone")],
        vec![json!("INC101"), json!("open"), json!("30"), json!("CORPORATE"), json!("CMI"), json!("")],
        vec![json!("INC102"), json!("CLOSED"), json!("1"), json!("CONSUMER"), json!("BDG")],
        vec![json!("INC103"), json!(" Open "), json!("n/a"), json!("CONSUMER"), json!("TSM")],
        vec![json!("INC104"), json!("OPEN"), json!("2"), json!(""), json!("GGK"), json!("Modem <LOS> & red")],
        vec![json!("INC105"), json!("OPEN")],
    ]
}

/// Telegram update JSON for a text message.
pub fn text_update(chat_id: i64, text: &str) -> String {
    json!({
        "update_id": 10_000,
        "message": {
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": { "id": chat_id, "type": "private" },
            "from": { "id": chat_id, "is_bot": false, "first_name": "Tester" },
            "text": text,
        }
    })
    .to_string()
}

/// Inbound texts and the ids they must yield with the default `inc` prefix.
pub const EXTRACTION_CASES: &[(&str, &[&str])] = &[
    ("check inc123 and INC123 please", &["INC123"]),
    ("INC2 INC10 inc1", &["INC1", "INC10", "INC2"]),
    ("tiket: Inc0042, inc0042.", &["INC0042"]),
    ("no tickets here", &[]),
    ("", &[]),
    ("incident42 xinc5 inc", &[]),
];

/// Build a multi-line reply of roughly `target` chars with lines of `line_len`.
pub fn long_reply(target: usize, line_len: usize) -> String {
    let mut lines = Vec::new();
    let mut total = 0;
    let mut i = 0usize;
    while total < target {
        let prefix = format!("<code>INC{i:05}</code> | ");
        let fill = line_len.saturating_sub(prefix.chars().count()).max(1);
        let line = format!("{prefix}{}", "x".repeat(fill));
        total += line.chars().count() + 1;
        lines.push(line);
        i += 1;
    }
    lines.join("\n")
}
