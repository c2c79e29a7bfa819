use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

#[test]
fn builds_bearer_auth_header() {
	let headers =
		ragroute_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut headers = Map::new();

	headers.insert("X-Retries".to_string(), Value::from(3));

	let err = ragroute_providers::auth_headers("secret", &headers)
		.expect_err("Expected header validation error.");

	assert!(matches!(err, ragroute_providers::Error::InvalidConfig { .. }));
}
