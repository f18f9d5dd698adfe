//! Loading an application from a TOML file.

use culm::config::{load_config, ConfigError, ValidationError};
use culm::{App, AppError};

mod common;

const APP_TOML: &str = r#"
[observability]
log_level = "debug"

[binding]
widen_int_to_float = true

[[routes]]
handler = "list_accounts"
pattern = "/accounts"
versions = [1]

[[routes]]
handler = "create_team"
pattern = "/teams"
versions = [1]
input = "Team"

[[routes]]
handler = "get_account"
pattern = "/accounts/{digits:6}"

[[schemas]]
name = "Team"
fields = [
    { name = "accounts", type = "[Account]" },
    { name = "score", type = "float", default = 0 },
]

[[schemas]]
name = "Account"
fields = [
    { name = "name", type = "string" },
    { name = "age", type = "int", optional = true },
]
"#;

#[test]
fn test_load_and_dispatch() {
    let path = common::temp_file("app.toml", APP_TOML);
    let config = load_config(&path).unwrap();
    assert_eq!(config.observability.log_level, "debug");

    let app = App::from_config(&config).unwrap();
    assert_eq!(app.router().len(), 3);
    assert_eq!(app.schemas().names().collect::<Vec<_>>(), vec!["Account", "Team"]);

    let dispatch = app
        .dispatch("/v1/teams", br#"{"accounts": [{"name": "a", "age": 3}], "score": 7}"#)
        .unwrap();
    assert_eq!(dispatch.handler, "create_team");
    let input = dispatch.input.unwrap();
    assert_eq!(input.get_f64("score"), Some(7.0));
    assert_eq!(input.get_list("accounts").unwrap()[0].get_i64("age"), Some(3));

    let dispatch = app.dispatch("/v1/teams", br#"{"accounts": []}"#).unwrap();
    assert_eq!(dispatch.input.unwrap().get_f64("score"), Some(0.0));

    let dispatch = app.dispatch("/accounts/000123", b"").unwrap();
    assert_eq!(dispatch.handler, "get_account");
    assert_eq!(dispatch.params.get(0), Some("000123"));
}

#[test]
fn test_rejected_body_reports_path() {
    let path = common::temp_file("rejected.toml", APP_TOML);
    let app = App::from_config(&load_config(&path).unwrap()).unwrap();

    let err = app
        .dispatch("/v1/teams", br#"{"accounts": [{"name": "a"}, {"age": 2}]}"#)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "request for `create_team` rejected: missing field `accounts[1].name`"
    );
    assert!(matches!(err, AppError::Rejected { .. }));
}

#[test]
fn test_invalid_file_lists_every_problem() {
    let path = common::temp_file(
        "invalid.toml",
        r#"
        [[routes]]
        handler = "a"
        pattern = "/x/{nope}"
        input = "Missing"

        [[routes]]
        handler = "b"
        pattern = "y"
        "#,
    );

    match load_config(&path) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 3);
            assert!(errors.contains(&ValidationError::UnknownInput {
                handler: "a".into(),
                schema: "Missing".into()
            }));
            assert!(errors.contains(&ValidationError::RelativePattern {
                handler: "b".into(),
                pattern: "y".into()
            }));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_cyclic_schemas_fail_to_build() {
    let path = common::temp_file(
        "cycle.toml",
        r#"
        [[schemas]]
        name = "Node"
        fields = [{ name = "next", type = "Node" }]
        "#,
    );
    let config = load_config(&path).unwrap();
    assert!(matches!(App::from_config(&config), Err(AppError::Schema(_))));
}
