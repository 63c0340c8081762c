use std::sync::Arc;

use traveltime_api_client::Coords;
use traveltime_api_client::auth::EnvCredentials;
use traveltime_api_client::proto::{
    ProtoCountry, ProtoTimeFilterFastRequest, ProtoTransportation, TravelTimeProtoClient,
};
use traveltime_api_client::rest::TravelTimeClient;
use traveltime_api_client::rest::geocoding::GeocodingOptions;

fn live_tests_enabled() -> bool {
    std::env::var("TRAVELTIME_LIVE_TESTS").ok().as_deref() == Some("1")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
#[ignore]
async fn live_rest_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }
    init_tracing();

    let credentials = match EnvCredentials::try_from_env() {
        Some(creds) => creds,
        None => return Ok(()),
    };
    let client = TravelTimeClient::builder()
        .credentials(Arc::new(credentials))
        .build()?;

    let maps = client.map_info().await?;
    assert!(!maps.maps.is_empty());

    let places = client
        .geocoding("Parliament Square", &GeocodingOptions::default().limit(1))
        .await?;
    assert!(!places.features.is_empty());

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_proto_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }
    init_tracing();

    let credentials = match EnvCredentials::try_from_env() {
        Some(creds) => creds,
        None => return Ok(()),
    };
    let client = TravelTimeProtoClient::builder()
        .credentials(Arc::new(credentials))
        .build()?;

    let response = client
        .time_filter_fast(&ProtoTimeFilterFastRequest {
            country: ProtoCountry::Uk,
            departure_location: Coords::new(51.508, -0.128),
            destination_coordinates: vec![Coords::new(51.536, -0.153)],
            transportation: ProtoTransportation::PublicTransport,
            travel_time: 7200,
        })
        .await?;
    assert_eq!(response.travel_times.len(), 1);

    Ok(())
}
