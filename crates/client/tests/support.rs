use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use citypermit_client::{ApiClient, CityPermitApi, HttpClient, SessionAuth};
use citypermit_domain::Credentials;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body of the permit-media-type discovery response (`GET /login`).
pub fn login_types_body() -> Value {
    json!({"PermitMediaTypes": [{"ID": 1}]})
}

/// Body of a successful login response carrying `token`.
pub fn login_body(token: &str) -> Value {
    json!({"Token": token, "LoginStatus": 0})
}

/// The `Authorization` header value the client sends for `token`.
pub fn token_header(token: &str) -> String {
    format!("Token {}", BASE64.encode(token.as_bytes()))
}

/// A reservation as the service reports it inside a permit payload.
pub fn reservation_item() -> Value {
    json!({
        "ReservationID": 1_844_553,
        "ValidFrom": "2025-12-23T00:47:00",
        "ValidUntil": "2025-12-23T23:59:00",
        "LicensePlate": {
            "DisplayValue": "AA11BB",
            "Value": "AA11BB",
        },
        "Units": 359,
        "PermitMediaCode": "32600",
    })
}

/// A favorite license plate as the service reports it.
pub fn license_plate_item(plate: &str, name: &str) -> Value {
    json!({
        "Value": plate,
        "Name": name,
        "ValidFrom": "0001-01-01T00:00:00",
        "ValidUntil": "9999-12-31T23:59:59.9999999",
    })
}

/// Full permit payload in the shape `POST /login/getbase` answers with.
pub fn permit_payload(
    active_reservations: Vec<Value>,
    license_plates: Vec<Value>,
    block_times: Vec<Value>,
) -> Value {
    json!({
        "Permit": {
            "ZoneCode": "zone 4",
            "PermitMedias": [{
                "TypeID": 1,
                "Code": "32600",
                "Balance": 6996,
                "ActiveReservations": active_reservations,
                "LicensePlates": license_plates,
                "History": {"Reservations": {"Items": []}},
            }],
            "BlockTimes": block_times,
        }
    })
}

/// Mount the discovery + login mocks for a single-token session.
pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_types_body()))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body(token)))
        .mount(server)
        .await;
}

/// Assemble the full client stack against a mock server.
pub fn api_for(server: &MockServer) -> CityPermitApi {
    let credentials =
        Credentials::new("user", "pass", server.uri()).expect("credentials should be valid");
    let http = HttpClient::new().expect("http client should build");
    let auth = Arc::new(SessionAuth::new(http.clone(), credentials.clone()));
    let client = Arc::new(ApiClient::new(http, auth, credentials.base_url()));
    CityPermitApi::new(client)
}

/// Count requests the server received for `request_path` with `request_method`.
pub async fn request_count(server: &MockServer, request_method: &str, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording should be enabled")
        .iter()
        .filter(|request| {
            request.method.as_str() == request_method && request.url.path() == request_path
        })
        .count()
}
