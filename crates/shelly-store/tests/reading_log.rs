//! End-to-end tests for the reading log: poll a (mock) meter, store the
//! result, and read it back by time range.

use std::io;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use shelly_core::{EnergyMeter, Error as DeviceError, MeterReading, MeterSource, MockTransport};
use shelly_store::{Error, RangeQuery, Store};
use shelly_types::timestamp::now_local;
use tempfile::TempDir;

fn temp_store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("shem_data.db")).unwrap();
    (dir, store)
}

fn reading(power: f64) -> MeterReading {
    MeterReading::new(Some(power), Some(10_000.0), Some(25.0))
}

#[test]
fn test_log_then_query_around_now_returns_one_matching_record() {
    let (_dir, store) = temp_store();
    let meter = MockTransport::new()
        .with_readings(&[reading(412.5), reading(-80.0)])
        .into_meter();

    let expected = meter.meter_info(1).unwrap();

    let before = now_local();
    let logged = store.log_reading(&meter, 1).unwrap().unwrap();
    let after = now_local();

    let rows = store.data_in_range(&before, &after).unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row, &logged);
    assert_eq!(row.power, expected["power"].as_f64());
    assert_eq!(row.total, expected["total"].as_f64());
    assert_eq!(row.total_returned, expected["total_returned"].as_f64());
}

#[test]
fn test_log_reading_through_trait_object() {
    let (_dir, store) = temp_store();
    let meter = MockTransport::new()
        .with_readings(&[reading(7.0)])
        .into_meter();
    let source: &dyn MeterSource = &meter;

    let record = store.log_reading(source, 0).unwrap().unwrap();
    assert_eq!(record.power, Some(7.0));
}

#[test]
fn test_unreachable_mock_leaves_row_count_unchanged() {
    let (_dir, store) = temp_store();
    store.insert_reading(&reading(1.0)).unwrap();

    let meter = MockTransport::new()
        .with_readings(&[reading(2.0)])
        .into_meter();
    meter.client().transport().fail_with(DeviceError::Unreachable {
        url: "http://mock.local/status".into(),
        reason: "connection refused".into(),
    });

    assert!(store.log_reading(&meter, 0).unwrap().is_none());
    assert_eq!(store.count_readings().unwrap(), 1);
}

/// Log output collected in memory.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_failed_poll_is_warned_once() {
    let (_dir, store) = temp_store();
    let meter = MockTransport::new().into_meter();
    meter.client().transport().fail_with(DeviceError::Unreachable {
        url: "http://mock.local/status".into(),
        reason: "connection refused".into(),
    });

    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let logged = tracing::subscriber::with_default(subscriber, || {
        store.log_reading(&meter, 0).unwrap()
    });
    assert!(logged.is_none());

    let text = log.text();
    assert_eq!(text.matches("WARN").count(), 1, "log was:\n{}", text);
    assert!(text.contains("connection refused"));
}

#[test]
fn test_unreachable_http_device_leaves_row_count_unchanged() {
    let (_dir, store) = temp_store();

    // Grab a free port, then close it so nothing is listening
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let meter =
        EnergyMeter::with_timeout(&format!("127.0.0.1:{}", port), Duration::from_millis(500))
            .unwrap();

    assert!(store.log_reading(&meter, 0).unwrap().is_none());
    assert_eq!(store.count_readings().unwrap(), 0);
}

#[test]
fn test_status_without_emeters_writes_nothing() {
    let (_dir, store) = temp_store();
    let meter = MockTransport::new()
        .with_status(json!({"relays": [{"ison": false}]}))
        .into_meter();

    assert!(store.log_reading(&meter, 0).unwrap().is_none());
    assert_eq!(store.count_readings().unwrap(), 0);
}

#[test]
fn test_non_object_meter_elements_write_nothing() {
    let (_dir, store) = temp_store();
    store.insert_reading(&reading(1.0)).unwrap();

    for element in [json!(null), json!(5), json!({})] {
        let meter = MockTransport::new()
            .with_status(json!({"emeters": [element.clone()]}))
            .into_meter();

        assert!(
            store.log_reading(&meter, 0).unwrap().is_none(),
            "{} should not be logged",
            element
        );
        assert_eq!(store.count_readings().unwrap(), 1);
    }
}

#[test]
fn test_increasing_inserts_returned_in_id_order() {
    let (_dir, store) = temp_store();
    let stamps = [
        "2024-03-10 08:00:00",
        "2024-03-10 08:00:01",
        "2024-03-10 09:30:00",
        "2024-03-11 00:00:00",
        "2024-04-01 12:00:00",
    ];

    let inserted: Vec<_> = stamps
        .iter()
        .enumerate()
        .map(|(i, ts)| store.insert_reading_at(&reading(i as f64), ts).unwrap())
        .collect();

    let rows = store
        .data_in_range(stamps[0], stamps[stamps.len() - 1])
        .unwrap();
    assert_eq!(rows, inserted);
    assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
}

#[test]
fn test_ranges_outside_data_are_empty() {
    let (_dir, store) = temp_store();
    store
        .insert_reading_at(&reading(1.0), "2024-06-15 10:00:00")
        .unwrap();
    store
        .insert_reading_at(&reading(2.0), "2024-06-15 11:00:00")
        .unwrap();

    let before = store
        .data_in_range("2024-06-14 00:00:00", "2024-06-15 09:59:59")
        .unwrap();
    let after = store
        .data_in_range("2024-06-15 11:00:01", "2024-12-31 23:59:59")
        .unwrap();

    assert!(before.is_empty());
    assert!(after.is_empty());
}

#[test]
fn test_new_year_scenario() {
    let (_dir, store) = temp_store();
    let first = store
        .insert_reading_at(&reading(100.0), "2024-01-01 00:00:00")
        .unwrap();
    let second = store
        .insert_reading_at(&reading(200.0), "2024-01-01 00:05:00")
        .unwrap();
    store
        .insert_reading_at(&reading(300.0), "2024-01-02 00:00:00")
        .unwrap();

    let rows = store
        .data_in_range("2024-01-01 00:00:00", "2024-01-01 23:59:59")
        .unwrap();
    assert_eq!(rows, vec![first.clone(), second]);

    // Both bounds are inclusive
    let exact = store
        .data_in_range("2024-01-01 00:00:00", "2024-01-01 00:00:00")
        .unwrap();
    assert_eq!(exact, vec![first]);
}

#[test]
fn test_invalid_bounds_rejected() {
    let (_dir, store) = temp_store();
    for (start, end) in [
        ("2024-1-1 00:00:00", "2024-01-02 00:00:00"),
        ("2024-01-01 00:00:00", "tomorrow"),
        ("2024-01-01", "2024-01-02"),
    ] {
        assert!(
            matches!(
                store.data_in_range(start, end),
                Err(Error::InvalidTimestamp(_))
            ),
            "{} .. {} should be rejected",
            start,
            end
        );
    }

    assert!(matches!(
        store.query(&RangeQuery::new().since("yesterday")),
        Err(Error::InvalidTimestamp(_))
    ));
}

#[test]
fn test_repeated_polls_append_rows() {
    let (_dir, store) = temp_store();
    let meter = MockTransport::new()
        .with_readings(&[reading(50.0)])
        .into_meter();

    let a = store.log_reading(&meter, 0).unwrap().unwrap();
    meter.client().transport().set_readings(&[reading(75.0)]);
    let b = store.log_reading(&meter, 0).unwrap().unwrap();

    assert!(b.id > a.id);
    assert_eq!(store.count_readings().unwrap(), 2);
    assert_eq!(store.latest_reading().unwrap().unwrap().power, Some(75.0));
}
