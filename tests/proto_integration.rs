use std::sync::Arc;
use std::time::Duration;

use prost::Message;
use wiremock::matchers::{basic_auth, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use traveltime_api_client::auth::StaticCredentials;
use traveltime_api_client::proto::wire;
use traveltime_api_client::proto::{
    ProtoCountry, ProtoTimeFilterFastRequest, ProtoTransportation, TravelTimeProtoClient,
};
use traveltime_api_client::rest::TravelTimeClient;
use traveltime_api_client::{Coords, RateLimitSettings, RateLimiter, TravelTimeError};

fn build_client(server: &MockServer) -> TravelTimeProtoClient {
    TravelTimeProtoClient::builder()
        .base_url(server.uri())
        .distance_base_url(format!("{}/distance", server.uri()))
        .credentials(Arc::new(StaticCredentials::new("test_app", "test_key")))
        .max_retries(0)
        .build()
        .unwrap()
}

fn limiter(retry_count: u32) -> RateLimiter {
    RateLimiter::new(RateLimitSettings {
        enabled: true,
        hits_per_minute: 6_000,
        retry_count,
        time_between_retries: Duration::from_millis(20),
    })
    .unwrap()
}

fn build_limited_client(server: &MockServer, limiter: RateLimiter) -> TravelTimeProtoClient {
    TravelTimeProtoClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_app", "test_key")))
        .max_retries(0)
        .rate_limiter(limiter)
        .build()
        .unwrap()
}

fn request(
    country: ProtoCountry,
    transportation: ProtoTransportation,
) -> ProtoTimeFilterFastRequest {
    ProtoTimeFilterFastRequest {
        country,
        departure_location: Coords::new(51.5, -0.1),
        destination_coordinates: vec![Coords::new(51.51, -0.11), Coords::new(51.49, -0.08)],
        transportation,
        travel_time: 7200,
    }
}

fn encoded(response: wire::TimeFilterFastResponse) -> Vec<u8> {
    response.encode_to_vec()
}

/// Checks the decoded request before answering.
struct ExpectOneToMany {
    properties: Vec<i32>,
}

impl Respond for ExpectOneToMany {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(message) = wire::TimeFilterFastRequest::decode(request.body.as_slice()) else {
            return ResponseTemplate::new(400);
        };
        let Some(one_to_many) = message.one_to_many_request else {
            return ResponseTemplate::new(400);
        };
        if one_to_many.location_deltas != vec![1000, -1000, -1000, 2000]
            || one_to_many.travel_time != 7200
            || one_to_many.properties != self.properties
        {
            return ResponseTemplate::new(400);
        }
        let distances = if self.properties.is_empty() { vec![] } else { vec![1500, 2500] };
        ResponseTemplate::new(200).set_body_bytes(encoded(wire::TimeFilterFastResponse {
            error: None,
            properties: Some(wire::Properties {
                travel_times: vec![300, -1],
                monthly_fares: vec![],
                distances,
            }),
        }))
    }
}

#[tokio::test]
async fn test_time_filter_fast_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/uk/time-filter/fast/pt"))
        .and(basic_auth("test_app", "test_key"))
        .and(header("content-type", "application/octet-stream"))
        .and(header("accept", "application/octet-stream"))
        .respond_with(ExpectOneToMany { properties: vec![] })
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client
        .time_filter_fast(&request(ProtoCountry::Uk, ProtoTransportation::PublicTransport))
        .await
        .unwrap();

    assert_eq!(response.travel_times, vec![300, -1]);
    assert!(response.distances.is_empty());
}

#[tokio::test]
async fn test_time_filter_fast_distance_uses_distance_host() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/distance/ie/time-filter/fast/driving"))
        .respond_with(ExpectOneToMany {
            properties: vec![wire::Property::Distances as i32],
        })
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let response = client
        .time_filter_fast_distance(&request(ProtoCountry::Ie, ProtoTransportation::Driving))
        .await
        .unwrap();

    assert_eq!(response.travel_times, vec![300, -1]);
    assert_eq!(response.distances, vec![1500, 2500]);
}

#[tokio::test]
async fn test_distance_rejects_unsupported_combinations() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let country = client
        .time_filter_fast_distance(&request(ProtoCountry::De, ProtoTransportation::Driving))
        .await;
    let mode = client
        .time_filter_fast_distance(&request(ProtoCountry::Uk, ProtoTransportation::PublicTransport))
        .await;

    assert!(matches!(country, Err(TravelTimeError::Config(_))));
    assert!(matches!(mode, Err(TravelTimeError::Config(_))));
}

#[tokio::test]
async fn test_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/nl/time-filter/fast/driving"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(encoded(
            wire::TimeFilterFastResponse {
                error: Some(wire::Error {
                    r#type: wire::ErrorType::SourceNotInGeometry as i32,
                }),
                properties: None,
            },
        )))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let error = client
        .time_filter_fast(&request(ProtoCountry::Nl, ProtoTransportation::Driving))
        .await
        .unwrap_err();

    match error {
        TravelTimeError::ProtoApi(kind) => assert_eq!(kind, "SourceNotInGeometry"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/uk/time-filter/fast/pt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xff, 0xff]))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let result = client
        .time_filter_fast(&request(ProtoCountry::Uk, ProtoTransportation::PublicTransport))
        .await;

    assert!(matches!(result, Err(TravelTimeError::ProtoDecode(_))));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/uk/time-filter/fast/pt"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = build_client(&server);
    let error = client
        .time_filter_fast(&request(ProtoCountry::Uk, ProtoTransportation::PublicTransport))
        .await
        .unwrap_err();

    assert!(matches!(error, TravelTimeError::InvalidResponse(message) if message.contains("401")));
}

#[tokio::test]
async fn test_requests_share_the_json_client_limiter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/uk/time-filter/fast/pt"))
        .respond_with(ExpectOneToMany { properties: vec![] })
        .expect(2)
        .mount(&server)
        .await;

    let json = TravelTimeClient::builder()
        .base_url(server.uri())
        .credentials(Arc::new(StaticCredentials::new("test_app", "test_key")))
        .rate_limiter(limiter(0))
        .build()
        .unwrap();
    let client = build_limited_client(&server, json.rate_limiter().clone());
    let pt = request(ProtoCountry::Uk, ProtoTransportation::PublicTransport);

    client.time_filter_fast(&pt).await.unwrap();
    assert_eq!(json.rate_limiter().reserved_hits(), 1);

    client.time_filter_fast(&pt).await.unwrap();
    assert_eq!(json.rate_limiter().reserved_hits(), 2);
    assert_eq!(client.rate_limiter().reserved_hits(), 2);
}

#[tokio::test]
async fn test_too_many_requests_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/uk/time-filter/fast/pt"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/uk/time-filter/fast/pt"))
        .respond_with(ExpectOneToMany { properties: vec![] })
        .mount(&server)
        .await;

    let client = build_limited_client(&server, limiter(1));
    let response = client
        .time_filter_fast(&request(ProtoCountry::Uk, ProtoTransportation::PublicTransport))
        .await
        .unwrap();

    assert_eq!(response.travel_times, vec![300, -1]);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
    assert_eq!(client.rate_limiter().reserved_hits(), 2);
    assert!(!client.rate_limiter().is_sleeping());
}

#[tokio::test]
async fn test_too_many_requests_gives_up_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/uk/time-filter/fast/pt"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .expect(2)
        .mount(&server)
        .await;

    let client = build_limited_client(&server, limiter(1));
    let error = client
        .time_filter_fast(&request(ProtoCountry::Uk, ProtoTransportation::PublicTransport))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        TravelTimeError::RateLimitExceeded {
            attempts: 2,
            api_error: None
        }
    ));
}
