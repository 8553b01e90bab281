use super::*;

fn test_client(base_url: &str) -> VkClient {
    VkClient::with_base_url("test-token", "5.199", 30, base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_puts_method_under_method_path() {
    let client = test_client("https://api.vk.com");
    let url = client
        .build_url("wall.get", &[("owner_id", "-1"), ("count", "100")])
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.vk.com/method/wall.get?owner_id=-1&count=100&access_token=test-token&v=5.199"
    );
}

#[test]
fn build_url_strips_trailing_slash() {
    let client = test_client("https://api.vk.com/");
    let url = client.build_url("users.get", &[]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.vk.com/method/users.get?access_token=test-token&v=5.199"
    );
}

#[test]
fn build_url_keeps_base_path_prefix() {
    let client = test_client("http://127.0.0.1:8080/proxy");
    let url = client.build_url("groups.getById", &[]).unwrap();
    assert!(
        url.as_str()
            .starts_with("http://127.0.0.1:8080/proxy/method/groups.getById?"),
        "unexpected url: {url}"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://api.vk.com");
    let url = client
        .build_url("groups.getById", &[("group_id", "a b&c")])
        .unwrap();
    assert!(
        url.as_str().contains("group_id=a+b%26c"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = VkClient::with_base_url("t", "5.199", 30, "not a url");
    assert!(matches!(result, Err(VkError::InvalidBaseUrl { .. })));
}

#[test]
fn debug_output_redacts_token() {
    let client = test_client("https://api.vk.com");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("test-token"), "token leaked: {rendered}");
}

#[test]
fn parse_envelope_returns_response() {
    let users: Vec<UserInfo> = VkClient::parse_envelope(
        "users.get",
        r#"{"response": [{"id": 1, "first_name": "A", "last_name": "B"}]}"#,
    )
    .unwrap();
    assert_eq!(users[0].id, 1);
}

#[test]
fn parse_envelope_maps_error_body() {
    let result: Result<WallPage, VkError> = VkClient::parse_envelope(
        "wall.get",
        r#"{"error": {"error_code": 15, "error_msg": "Access denied"}}"#,
    );
    match result {
        Err(VkError::Api { code, message }) => {
            assert_eq!(code, 15);
            assert_eq!(message, "Access denied");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn parse_envelope_without_response_or_error() {
    let result: Result<WallPage, VkError> = VkClient::parse_envelope("wall.get", "{}");
    assert!(matches!(result, Err(VkError::MissingResponse { ref method }) if method == "wall.get"));
}

#[test]
fn parse_envelope_rejects_non_json() {
    let result: Result<WallPage, VkError> =
        VkClient::parse_envelope("wall.get", "<html>bad gateway</html>");
    assert!(matches!(result, Err(VkError::Deserialize { ref context, .. }) if context == "wall.get"));
}
