use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use cloud_recording_service::{
    config::config_model::{
        AppCredentials, Cors, CustomerCredentials, DotEnvyConfig, Provider, Server, Storage,
        TokenSettings,
    },
    infrastructure::{
        axum_http::http_serve, provider::cloud_recording_client::CloudRecordingClient,
        token::app_token_issuer::AppTokenIssuer,
    },
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const APP_ID: &str = "970CA35de60c44645bbae8a215061b33";

fn config(base_url: &str, provider_timeout: u64) -> DotEnvyConfig {
    DotEnvyConfig {
        server: Server {
            port: 0,
            body_limit: 1,
            timeout: 30,
        },
        app: AppCredentials {
            app_id: APP_ID.to_string(),
            app_certificate: "5CFd2fd1755d40ecb72977518be15d3b".to_string(),
        },
        customer: CustomerCredentials {
            customer_id: "customer".to_string(),
            customer_certificate: "secret".to_string(),
        },
        provider: Provider {
            base_url: base_url.to_string(),
            timeout: provider_timeout,
        },
        storage: Storage {
            vendor: 1,
            region: 0,
            bucket: "recordings".to_string(),
            access_key: "access".to_string(),
            secret_key: "storage-secret".to_string(),
            file_name_prefix: vec!["daily".to_string()],
        },
        token: TokenSettings {
            expire_seconds: 3600,
        },
        cors: Cors {
            allow_origin: "*".to_string(),
        },
    }
}

fn app(server: &MockServer, provider_timeout: u64) -> Router {
    let config = config(&server.uri(), provider_timeout);
    let gateway =
        CloudRecordingClient::new(&config.provider, &config.app, &config.customer).unwrap();
    let token_issuer = AppTokenIssuer::new(&config.app);

    http_serve::router(&config, Arc::new(gateway), Arc::new(token_issuer)).unwrap()
}

fn provider_path(suffix: &str) -> String {
    format!("/{}/cloud_recording/{}", APP_ID, suffix)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn scenario_a_start_recording_happy_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(provider_path("acquire")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resourceId": "res-A" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(provider_path("resourceid/res-A/mode/mix/start")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cname": "testChannel",
            "resourceId": "res-A",
            "sid": "sid-A"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, 5)
        .oneshot(post_json(
            "/cloud_recording/startRecording",
            json!({ "channelName": "testChannel", "recordingMode": "mix" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let uid = body["UID"].as_str().unwrap().to_string();
    assert!(uid.parse::<u32>().unwrap() > 0);
    assert_eq!(body["resourceId"], "res-A");
    assert_eq!(body["recordingId"], "sid-A");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.path().ends_with("/acquire"));
    assert!(requests[1].url.path().ends_with("/start"));

    let acquire: Value = requests[0].body_json().unwrap();
    assert_eq!(acquire["uid"], uid.as_str());
    assert!(acquire["clientRequest"].get("startParameter").is_none());

    let start: Value = requests[1].body_json().unwrap();
    assert_eq!(start["uid"], uid.as_str());
    let start_parameter = &start["clientRequest"]["startParameter"];
    assert!(start_parameter["token"].as_str().unwrap().starts_with("007"));
    assert_eq!(start_parameter["storageConfig"]["bucket"], "recordings");
    assert_eq!(start_parameter["storageConfig"]["fileNamePrefix"], json!(["daily"]));
    assert_eq!(
        start_parameter["recordingConfig"]["transcodingConfig"]["mixedVideoLayout"],
        1
    );
}

#[tokio::test]
async fn scenario_b_bogus_mode_never_reaches_the_provider() {
    let server = MockServer::start().await;

    let response = app(&server, 5)
        .oneshot(post_json(
            "/cloud_recording/startRecording",
            json!({ "channelName": "testChannel", "recordingMode": "bogus" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], 400);
    assert!(body.get("resourceId").is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn bogus_mode_without_channel_is_a_json_validation_error() {
    let server = MockServer::start().await;

    let response = app(&server, 5)
        .oneshot(post_json(
            "/cloud_recording/startRecording",
            json!({ "recordingMode": "bogus" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    let body = json_body(response).await;
    assert_eq!(body["code"], 400);
    assert!(body["message"].as_str().unwrap().contains("bogus"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_channel_name_is_a_json_validation_error() {
    let server = MockServer::start().await;

    let response = app(&server, 5)
        .oneshot(post_json(
            "/cloud_recording/startRecording",
            json!({ "recordingMode": "mix" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "channelName is required");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn scenario_c_stop_is_forwarded_once_and_relayed_verbatim() {
    let server = MockServer::start().await;
    let upstream = r#"{"resourceId":"res-Y","sid":"sid-X","serverResponse":{"uploadingStatus":"uploaded"}}"#;
    Mock::given(method("POST"))
        .and(path(provider_path("resourceid/res-Y/sid/sid-X/mode/mix/stop")))
        .respond_with(ResponseTemplate::new(200).set_body_string(upstream))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, 5)
        .oneshot(post_json(
            "/cloud_recording/stopRecording",
            json!({
                "cname": "testChannel",
                "UID": "123456789",
                "recordingId": "sid-X",
                "resourceId": "res-Y",
                "recordingMode": "mix",
                "async_stop": true
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    assert_eq!(bytes, upstream.as_bytes());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let forwarded: Value = requests[0].body_json().unwrap();
    assert_eq!(
        forwarded,
        json!({
            "cname": "testChannel",
            "uid": "123456789",
            "clientRequest": { "async_stop": true }
        })
    );
}

#[tokio::test]
async fn scenario_d_acquire_timeout_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(provider_path("acquire")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "resourceId": "late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(provider_path("resourceid/late/mode/individual/start")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = app(&server, 1)
        .oneshot(post_json(
            "/cloud_recording/startRecording",
            json!({ "channelName": "testChannel", "recordingMode": "individual" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["reached"], "uid_assigned");
    assert!(body.get("resourceId").is_none());
}

#[tokio::test]
async fn failed_start_surfaces_orphaned_resource_and_upstream_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(provider_path("acquire")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "resourceId": "res-O" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(provider_path("resourceid/res-O/mode/mix/start")))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"code":2,"reason":"invalid parameter"}"#),
        )
        .mount(&server)
        .await;

    let response = app(&server, 5)
        .oneshot(post_json(
            "/cloud_recording/startRecording",
            json!({ "channelName": "testChannel", "recordingMode": "mix" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["resourceId"], "res-O");
    assert_eq!(body["reached"], "token_issued");
    assert_eq!(body["upstreamStatus"], 400);
    assert_eq!(body["upstreamBody"], r#"{"code":2,"reason":"invalid parameter"}"#);
}

#[tokio::test]
async fn rejected_customer_credentials_map_to_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(provider_path("acquire")))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid authorization header"))
        .mount(&server)
        .await;

    let response = app(&server, 5)
        .oneshot(post_json(
            "/cloud_recording/startRecording",
            json!({ "channelName": "testChannel", "recordingMode": "web",
                    "webRecordingConfig": { "url": "https://example.com/page" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["upstreamStatus"], 401);
}

#[tokio::test]
async fn get_status_accepts_sid_and_mode_aliases() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(provider_path("resourceid/res-S/sid/sid-S/mode/individual/query")))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"sid":"sid-S"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, 5)
        .oneshot(
            Request::get("/cloud_recording/getStatus?resourceId=res-S&sid=sid-S&mode=individual")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "sid": "sid-S" }));
}

#[tokio::test]
async fn update_layout_forwards_client_request_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(provider_path("resourceid/res-U/sid/sid-U/updateLayout")))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let client_request = json!({
        "mixedVideoLayout": 3,
        "layoutConfig": [{ "x_axis": 0.0, "y_axis": 0.0, "width": 0.5, "height": 0.5 }]
    });

    let response = app(&server, 5)
        .oneshot(post_json(
            "/cloud_recording/update/layout",
            json!({
                "cname": "testChannel",
                "uid": "42",
                "resourceId": "res-U",
                "recordingId": "sid-U",
                "clientRequest": client_request
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let forwarded: Value = server.received_requests().await.unwrap()[0]
        .body_json()
        .unwrap();
    assert_eq!(forwarded["clientRequest"], client_request);
}

#[tokio::test]
async fn get_token_issues_signed_rtc_token() {
    let server = MockServer::start().await;

    let response = app(&server, 5)
        .oneshot(post_json(
            "/token/getToken",
            json!({ "tokenType": "rtc", "channel": "lobby", "uid": "42" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["token"].as_str().unwrap().starts_with("007"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_token_rejects_unknown_type() {
    let server = MockServer::start().await;

    let response = app(&server, 5)
        .oneshot(post_json("/token/getToken", json!({ "tokenType": "voice" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_status_query_rejects_missing_parameters() {
    let server = MockServer::start().await;

    let response = app(&server, 5)
        .oneshot(
            Request::get("/cloud_recording/getStatus?resourceId=res")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(server.received_requests().await.unwrap().is_empty());
}
