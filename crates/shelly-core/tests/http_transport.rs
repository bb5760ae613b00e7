//! HTTP transport tests against a local axum server.
//!
//! The server runs on its own tokio runtime in a background thread so the
//! blocking `reqwest` client under test never runs inside an async context.

use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Value, json};
use shelly_core::{DeviceClient, EnergyMeter, Error, FailureKind, MeterSource};

fn status_body() -> Value {
    json!({
        "uptime": 1234,
        "emeters": [
            {"power": 512.25, "reactive": 3.5, "voltage": 229.8, "is_valid": true,
             "total": 45678.9, "total_returned": 12.5},
            {"power": -80.0, "reactive": 0.0, "voltage": 229.8, "is_valid": true,
             "total": 0.0, "total_returned": 777.0}
        ]
    })
}

/// Start a fake Shelly EM and return its address.
fn spawn_device() -> SocketAddr {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async move {
            let app = Router::new()
                .route("/status", get(|| async { axum::Json(status_body()) }))
                .route(
                    "/settings",
                    get(|| async { axum::Json(json!({"name": "garage-em", "device": {"type": "SHEM"}})) }),
                )
                .route("/broken/status", get(|| async { "{\"emeters\": [" }))
                .route(
                    "/error/status",
                    get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
                )
                .route(
                    "/slow/status",
                    get(|| async {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        axum::Json(status_body())
                    }),
                );

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    rx.recv_timeout(Duration::from_secs(10)).unwrap()
}

#[test]
fn test_status_and_settings_over_http() {
    let addr = spawn_device();
    let client = DeviceClient::new(&addr.to_string()).unwrap();

    assert_eq!(client.base_url(), format!("http://{}", addr));
    assert_eq!(client.status().unwrap(), status_body());
    assert_eq!(client.settings().unwrap()["name"], "garage-em");
}

#[test]
fn test_meter_accessors_over_http() {
    let addr = spawn_device();
    let meter = EnergyMeter::new(&addr.to_string()).unwrap();

    assert_eq!(meter.meter_info(1).unwrap(), status_body()["emeters"][1]);
    assert_eq!(meter.power_w(0).unwrap(), 512.25);
    assert_eq!(meter.energy_consumed_wh(0).unwrap(), 45678.9);
    assert_eq!(meter.energy_returned_wh(1).unwrap(), 777.0);
    assert_eq!(meter.reading(1).unwrap().power, Some(-80.0));
}

#[test]
fn test_index_past_end_over_http() {
    let addr = spawn_device();
    let meter = EnergyMeter::new(&addr.to_string()).unwrap();

    let err = meter.meter_info(5).unwrap_err();
    assert_eq!(err.kind(), FailureKind::AbsentIndex);
}

#[test]
fn test_not_found_is_http_status() {
    let addr = spawn_device();
    let client = DeviceClient::new(&addr.to_string()).unwrap();

    let err = client.fetch("/does-not-exist").unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    assert_eq!(err.kind(), FailureKind::Transport);
}

#[test]
fn test_server_error_is_http_status() {
    let addr = spawn_device();
    let client = DeviceClient::new(&format!("http://{}/error", addr)).unwrap();

    assert!(matches!(
        client.status(),
        Err(Error::HttpStatus { status: 500, .. })
    ));
}

#[test]
fn test_malformed_body_is_decode_error() {
    let addr = spawn_device();
    let meter = EnergyMeter::new(&format!("http://{}/broken/", addr)).unwrap();

    let err = meter.meter_info(0).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.is_transport());
}

#[test]
fn test_slow_device_times_out() {
    let addr = spawn_device();
    let meter =
        EnergyMeter::with_timeout(&format!("http://{}/slow", addr), Duration::from_millis(300))
            .unwrap();

    let err = meter.meter_info(0).unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }), "got {:?}", err);
}

#[test]
fn test_unreachable_device_yields_no_data() {
    // Bind then drop a listener so the port is very likely closed.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let meter = EnergyMeter::new(&format!("127.0.0.1:{}", port)).unwrap();

    let source: &dyn MeterSource = &meter;
    assert!(source.meter_info(0).ok().is_none());
}
