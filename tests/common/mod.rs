//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use culm::binding::{ScalarType, SchemaDescriptor};
use culm::routing::{Locator, PathPattern, Segment};

/// `{name: string, age: int, email: string}`
pub fn account() -> Arc<SchemaDescriptor> {
    Arc::new(
        SchemaDescriptor::builder("Account")
            .scalar("name", ScalarType::String)
            .scalar("age", ScalarType::Int)
            .scalar("email", ScalarType::String)
            .build()
            .unwrap(),
    )
}

/// `{accounts: [Account], datetime: string}`
pub fn account_list() -> SchemaDescriptor {
    SchemaDescriptor::builder("AccountList")
        .list_of("accounts", account())
        .scalar("datetime", ScalarType::String)
        .build()
        .unwrap()
}

/// `{account: Account, datetime: string}`
pub fn account_nested() -> SchemaDescriptor {
    SchemaDescriptor::builder("AccountNested")
        .nested("account", account())
        .scalar("datetime", ScalarType::String)
        .build()
        .unwrap()
}

/// `{name: string, age: optional int}`
pub fn person() -> SchemaDescriptor {
    SchemaDescriptor::builder("Person")
        .scalar("name", ScalarType::String)
        .optional("age", ScalarType::Int)
        .build()
        .unwrap()
}

pub fn account_json(name: &str, age: i64) -> serde_json::Value {
    serde_json::json!({"name": name, "age": age, "email": format!("{}@example.com", name)})
}

/// Build a pattern from literal and flexible segments.
pub fn pattern<I>(segments: I) -> PathPattern
where
    I: IntoIterator<Item = Segment>,
{
    PathPattern::new(segments.into_iter().collect())
}

pub fn lit(text: &str) -> Segment {
    Segment::literal(text)
}

pub fn any() -> Segment {
    Segment::Flexible(Locator::any())
}

pub fn digits(count: usize) -> Segment {
    Segment::Flexible(Locator::digits(count).unwrap())
}

/// Write `content` to a fresh file under the system temp dir.
pub fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("culm-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
