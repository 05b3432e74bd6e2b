mod common;

use common::FakeDriver;
use image::ImageFormat;
use pagestitch::{CaptureConfig, Dimension, Error, Screenshotter};
use std::time::Duration;

fn fast_config() -> CaptureConfig {
    CaptureConfig {
        settle_delay: Duration::ZERO,
        ..Default::default()
    }
}

#[tokio::test]
async fn worker_runs_capture_commands_in_order() {
    let shooter = Screenshotter::new(
        || Ok(FakeDriver::new(Dimension::new(60, 90), Dimension::new(40, 30))),
        fast_config(),
    )
    .await
    .expect("worker starts");

    shooter.navigate("http://example.test/").await.unwrap();
    assert_eq!(shooter.prepare_document(Some(1)).await.unwrap(), 6);

    let png = shooter.png().await.unwrap();
    let canvas = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (120, 180));

    let b64 = shooter.base64().await.unwrap();
    assert!(!b64.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("async.png");
    shooter.save(&path).await.unwrap();
    assert!(path.exists());

    shooter.close().await.unwrap();
}

#[tokio::test]
async fn driver_construction_failure_is_reported() {
    let res = Screenshotter::new(
        || -> pagestitch::Result<FakeDriver> { Err(Error::DriverUnavailable("no browser".into())) },
        fast_config(),
    )
    .await;
    assert!(matches!(res, Err(Error::DriverUnavailable(_))));
}

#[tokio::test]
async fn invalid_config_is_reported_from_the_worker() {
    let res = Screenshotter::new(
        || Ok(FakeDriver::new(Dimension::new(10, 10), Dimension::new(10, 10))),
        CaptureConfig { scale: 0, ..fast_config() },
    )
    .await;
    assert!(matches!(res, Err(Error::ConfigError(_))));
}

#[tokio::test]
async fn commands_after_close_fail() {
    let shooter = Screenshotter::new(
        || Ok(FakeDriver::new(Dimension::new(10, 10), Dimension::new(10, 10))),
        fast_config(),
    )
    .await
    .unwrap();
    let other = shooter.clone();
    shooter.close().await.unwrap();

    assert!(other.png().await.is_err());
}
