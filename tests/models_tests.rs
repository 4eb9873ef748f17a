// Model serialization tests (wire keys, zero values, platform names)

use hostmetrics::models::*;

#[test]
fn test_snapshot_serializes_with_exact_keys() {
    let snapshot = MetricsSnapshot {
        cpu_load: 15.0,
        memory: ByteRange {
            total: 1_024_000_000,
            used: 614_400_000,
        },
        disk: ByteRange {
            total: 500_000_000_000,
            used: 250_000_000_000,
        },
    };
    let json: serde_json::Value = serde_json::to_value(snapshot).unwrap();
    let obj = json.as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["cpu_load", "disk", "memory"]);
    assert_eq!(json["cpu_load"], 15.0);
    assert_eq!(json["memory"]["total"], 1_024_000_000u64);
    assert_eq!(json["memory"]["used"], 614_400_000u64);
    assert_eq!(json["disk"]["total"], 500_000_000_000u64);
    assert_eq!(json["disk"]["used"], 250_000_000_000u64);
}

#[test]
fn test_zeroed_snapshot_has_no_nulls() {
    let json = serde_json::to_string(&MetricsSnapshot::zeroed()).unwrap();
    assert_eq!(
        json,
        r#"{"cpu_load":0.0,"memory":{"total":0,"used":0},"disk":{"total":0,"used":0}}"#
    );
}

#[test]
fn test_byte_range_from_free_saturates() {
    assert_eq!(ByteRange::from_free(100, 30), ByteRange { total: 100, used: 70 });
    assert_eq!(ByteRange::from_free(100, 130), ByteRange { total: 100, used: 0 });
    assert!(ByteRange::zero().is_zero());
    assert!(!ByteRange::from_free(1, 1).is_zero());
}

#[test]
fn test_platform_from_os_name() {
    assert_eq!(PlatformKind::from_os_name("Darwin"), PlatformKind::Darwin);
    assert_eq!(PlatformKind::from_os_name("macos"), PlatformKind::Darwin);
    assert_eq!(PlatformKind::from_os_name("Linux"), PlatformKind::Linux);
    assert_eq!(PlatformKind::from_os_name(" linux\n"), PlatformKind::Linux);
    assert_eq!(PlatformKind::from_os_name("windows"), PlatformKind::Unknown);
    assert_eq!(PlatformKind::from_os_name(""), PlatformKind::Unknown);
}

#[test]
fn test_platform_detect_matches_build_target() {
    let expected = if cfg!(target_os = "linux") {
        PlatformKind::Linux
    } else if cfg!(target_os = "macos") {
        PlatformKind::Darwin
    } else {
        PlatformKind::Unknown
    };
    assert_eq!(PlatformKind::detect(), expected);
}

#[test]
fn test_platform_and_cpu_metric_names() {
    assert_eq!(PlatformKind::Darwin.to_string(), "darwin");
    assert_eq!(
        serde_json::to_string(&PlatformKind::Linux).unwrap(),
        "\"linux\""
    );
    assert_eq!(
        serde_json::to_string(&CpuMetric::LoadAverage).unwrap(),
        "\"load_average\""
    );
    assert_eq!(CpuMetric::default(), CpuMetric::Percent);
}
