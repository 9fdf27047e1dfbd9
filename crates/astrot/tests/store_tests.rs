use std::sync::Arc;
use std::time::Duration;

use astrot::chart::{BirthData, ChartBuilder, ChartSettings};
use astrot::ephemeris::{AnalyticEphemeris, FixedEphemeris};
use astrot::error::AstrotError;
use astrot::store::{ChartService, ChartStore, InMemoryChartStore};
use astrot::zodiac::Body;
use chrono::{NaiveDate, NaiveTime};

fn birth(hour: u32) -> BirthData {
    BirthData::new(
        NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
        NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
        51.5074,
        -0.1278,
        "UTC+01:00",
    )
}

fn analytic_service() -> ChartService<InMemoryChartStore> {
    ChartService::new(
        ChartBuilder::new(Arc::new(AnalyticEphemeris::new()), ChartSettings::default()),
        InMemoryChartStore::new(),
    )
}

#[tokio::test]
async fn test_submit_persists_complete_chart() {
    let service = analytic_service();
    let chart = service.submit("user-1", birth(14)).await.unwrap();

    assert_eq!(chart.user_id, "user-1");
    assert_eq!(chart.created_at, chart.updated_at);
    assert!(chart.derived.body(Body::Sun).is_some());

    let stored = service.fetch("user-1").await.unwrap().unwrap();
    assert_eq!(stored, chart);
    assert_eq!(service.store().len().await, 1);
}

#[tokio::test]
async fn test_failed_provider_persists_nothing() {
    let service = ChartService::new(
        ChartBuilder::new(
            Arc::new(FixedEphemeris::failing("ephemeris files missing")),
            ChartSettings::default(),
        ),
        InMemoryChartStore::new(),
    );

    let err = service.submit("user-2", birth(14)).await.unwrap_err();
    assert!(err.is_data_unavailable());
    assert!(service.store().is_empty().await);
    assert_eq!(service.fetch("user-2").await.unwrap(), None);
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let provider = FixedEphemeris::equal_houses(0.0)
        .with_body(Body::Sun, 84.0, 1.0)
        .with_body(Body::Moon, 200.0, 13.0)
        .with_delay(Duration::from_millis(500));
    let settings = ChartSettings {
        bodies: vec![Body::Sun, Body::Moon],
        timeout: Duration::from_millis(20),
        ..ChartSettings::default()
    };
    let service = ChartService::new(
        ChartBuilder::new(Arc::new(provider), settings),
        InMemoryChartStore::new(),
    );

    let err = service.submit("user-3", birth(14)).await.unwrap_err();
    match err {
        AstrotError::DataUnavailable { provider, reason } => {
            assert_eq!(provider, "fixture");
            assert!(reason.contains("20 ms"), "{}", reason);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(service.store().is_empty().await);
}

#[tokio::test]
async fn test_resubmit_keeps_identity() {
    let service = analytic_service();
    let original = service.submit("user-4", birth(14)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    let corrected = service.resubmit("user-4", birth(9)).await.unwrap();

    assert_eq!(corrected.id, original.id);
    assert_eq!(corrected.created_at, original.created_at);
    assert!(corrected.updated_at >= original.updated_at);
    assert_eq!(corrected.birth_data.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    assert_ne!(corrected.derived.julian_day, original.derived.julian_day);
    assert_eq!(service.store().len().await, 1);
}

#[tokio::test]
async fn test_second_submit_recomputes_same_chart() {
    let service = analytic_service();
    let first = service.submit("user-6", birth(14)).await.unwrap();
    let second = service.submit("user-6", birth(14)).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.derived, first.derived);
    assert_eq!(service.store().len().await, 1);

    let third = service.submit("user-6", birth(9)).await.unwrap();
    assert_eq!(third.id, first.id);
    assert_ne!(third.derived.julian_day, first.derived.julian_day);
    assert_eq!(service.fetch("user-6").await.unwrap(), Some(third));
}

#[tokio::test]
async fn test_resubmit_without_chart_is_storage_error() {
    let service = analytic_service();
    let err = service.resubmit("nobody", birth(14)).await.unwrap_err();
    assert!(matches!(err, AstrotError::Storage(_)));
}

#[tokio::test]
async fn test_resubmit_failure_keeps_previous_chart() {
    let store = InMemoryChartStore::new();
    let good = ChartService::new(
        ChartBuilder::new(Arc::new(AnalyticEphemeris::new()), ChartSettings::default()),
        store.clone(),
    );
    let original = good.submit("user-5", birth(14)).await.unwrap();

    let broken = ChartService::new(
        ChartBuilder::new(
            Arc::new(FixedEphemeris::failing("offline")),
            ChartSettings::default(),
        ),
        store.clone(),
    );
    assert!(broken.resubmit("user-5", birth(9)).await.is_err());
    assert_eq!(store.load("user-5").await.unwrap(), Some(original));
}

#[tokio::test]
async fn test_concurrent_submissions_do_not_interfere() {
    let service = Arc::new(analytic_service());
    let mut handles = Vec::new();
    for hour in 0..8u32 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.submit(&format!("user-{}", hour), birth(hour)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(service.store().len().await, 8);

    let reference = analytic_service()
        .builder()
        .build(&birth(3))
        .unwrap();
    let stored = service.fetch("user-3").await.unwrap().unwrap();
    assert_eq!(stored.derived, reference);
}
