//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

/// Keyed word list with full display data.
pub const UNIT_10: &str = "\
# Unit 10
W: agency
T: 代辦處;經銷處
S: Many people worked at the agency.
SZ: 許多人在這家代辦處工作。
B: 5

W: business
T: 生意
S: My father runs a small business.

W: mystery
T: 謎
";

/// Plain list, one answer per line.
pub const SEASONS: &str = "冬天\n季節\n煙火\n";

/// Files placed in the test word list directory.
pub fn word_list_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("unit-10.md", UNIT_10),
        ("seasons.txt", SEASONS),
        ("broken.md", "T: translation without a word\n"),
    ]
}

/// Inline create request for the given answers.
pub fn create_request(answers: &[&str]) -> Value {
    let items: Vec<Value> = answers.iter().map(|a| json!({ "answer": a })).collect();
    json!({ "items": items })
}
