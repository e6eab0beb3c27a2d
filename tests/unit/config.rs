use super::*;

#[test]
fn defaults_match_the_reference_host() {
    let cfg = EngineConfig::default();
    assert_eq!((cfg.width, cfg.height), (640, 480));
    assert_eq!(cfg.device().unwrap(), DeviceType::Gl);
    assert_eq!(cfg.output.kind, OutputKind::Ppm);
    assert_eq!(cfg.output.dir, PathBuf::from("build-native/out"));
    cfg.validate().unwrap();
}

#[test]
fn rejects_bad_sizes_and_devices() {
    let mut cfg = EngineConfig {
        width: 0,
        ..EngineConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(CanopyError::Validation(_))));
    cfg.width = -10;
    assert!(cfg.validate().is_err());
    cfg.width = 10;
    cfg.device_type = 4;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("unknown device type 4"));
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: EngineConfig =
        serde_json::from_str(r#"{ "width": 320, "output": { "kind": "memory" } }"#).unwrap();
    assert_eq!(cfg.width, 320);
    assert_eq!(cfg.height, 480);
    assert_eq!(cfg.output.kind, OutputKind::Memory);
    assert_eq!(cfg.output.dir, PathBuf::from(DEFAULT_OUT_DIR));
}

#[test]
fn unknown_fields_are_rejected() {
    let res: Result<EngineConfig, _> = serde_json::from_str(r#"{ "widht": 320 }"#);
    assert!(res.is_err());
}

#[test]
fn from_json_path_validates() {
    let dir = std::env::temp_dir().join(format!("canopy_config_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let good = dir.join("good.json");
    std::fs::write(&good, r#"{ "device_type": 0, "native_surface": 77 }"#).unwrap();
    let cfg = EngineConfig::from_json_path(&good).unwrap();
    assert_eq!(cfg.device().unwrap(), DeviceType::Metal);
    assert_eq!(cfg.native_surface, NativeSurface(77));

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{ "height": -1 }"#).unwrap();
    assert!(matches!(
        EngineConfig::from_json_path(&bad),
        Err(CanopyError::Validation(_))
    ));

    assert!(matches!(
        EngineConfig::from_json_path(dir.join("missing.json")),
        Err(CanopyError::Other(_))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
