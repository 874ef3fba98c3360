use super::*;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_are_valid() {
    let config = ConfigBuilder::new().build().unwrap();
    assert_eq!(config.job.index_env, "SLURM_ARRAY_TASK_ID");
    assert_eq!(config.job.index, 0);
    assert_eq!(config.job.matrix_size, 10_000);
    assert_eq!(config.job.device, DevicePreference::Auto);
    assert_eq!(config.output.results_dir, PathBuf::from("./logs"));
    assert_eq!(config.output.format, ResultFormat::Text);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn partial_file_keeps_other_defaults() {
    let file = write_config(
        r#"
[job]
matrix_size = 256
parameters = [0.1, 0.2]

[output]
format = "json"
"#,
    );
    let config = ConfigBuilder::from_file(file.path()).unwrap().build().unwrap();
    assert_eq!(config.job.matrix_size, 256);
    assert_eq!(config.job.parameters.values(), &[0.1, 0.2]);
    assert_eq!(config.job.index_env, "SLURM_ARRAY_TASK_ID");
    assert_eq!(config.output.format, ResultFormat::Json);
    assert_eq!(config.output.results_dir, PathBuf::from("./logs"));
}

#[test]
fn empty_parameter_list_in_file_is_a_parse_error() {
    let file = write_config("[job]\nparameters = []\n");
    let err = ConfigBuilder::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
}

#[test]
fn unknown_device_in_file_is_a_parse_error() {
    let file = write_config("[job]\ndevice = \"tpu\"\n");
    assert!(matches!(ConfigBuilder::from_file(file.path()), Err(ConfigError::Parse { .. })));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = ConfigBuilder::load(Some(&missing)).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn missing_default_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("tillicum.toml");
    let config = ConfigBuilder::from_file_or_default(&missing).unwrap().build().unwrap();
    assert_eq!(config, TillicumConfig::default());
}

#[test]
#[serial(tillicum_env)]
fn missing_file_named_by_env_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("typo.toml");
    temp_env::with_var(CONFIG_ENV, Some(missing.as_os_str()), || {
        let err = ConfigBuilder::load(None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(ref path) if *path == missing), "got {err:?}");
    });
}

#[test]
#[serial(tillicum_env)]
fn file_named_by_env_is_loaded() {
    let file = write_config("[job]\nmatrix_size = 96\n");
    temp_env::with_var(CONFIG_ENV, Some(file.path().as_os_str()), || {
        let config = ConfigBuilder::load(None).unwrap().build().unwrap();
        assert_eq!(config.job.matrix_size, 96);
    });
}

#[test]
fn oversized_sleep_is_rejected() {
    let err = ConfigBuilder::new().simulate_work_secs(Some(1e20)).build().unwrap_err();
    assert!(
        matches!(err, ConfigError::Invalid { key: "job.simulate_work_secs", .. }),
        "got {err:?}"
    );

    let file = write_config("[job]\nsimulate_work_secs = 1e20\n");
    let err = ConfigBuilder::from_file(file.path()).unwrap().build().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn sleep_duration_accepts_fractional_seconds() {
    assert_eq!(sleep_duration("k", 0.5).unwrap(), Duration::from_millis(500));
    assert_eq!(sleep_duration("k", 0.0).unwrap(), Duration::ZERO);
    assert!(sleep_duration("k", -1.0).is_err());
    assert!(sleep_duration("k", f64::NAN).is_err());
    assert!(sleep_duration("k", f64::INFINITY).is_err());
}

#[test]
#[serial(tillicum_env)]
fn env_overrides_file_values() {
    let file = write_config("[job]\nmatrix_size = 32\n");
    temp_env::with_vars(
        [
            ("SLURM_ARRAY_TASK_ID", Some("4")),
            (MATRIX_SIZE_ENV, Some("48")),
            (DEVICE_ENV, Some("CPU")),
            (RESULTS_DIR_ENV, Some("/scratch/results")),
        ],
        || {
            let config =
                ConfigBuilder::from_file(file.path()).unwrap().with_env().unwrap().build().unwrap();
            assert_eq!(config.job.index, 4);
            assert_eq!(config.job.matrix_size, 48);
            assert_eq!(config.job.device, DevicePreference::Cpu);
            assert_eq!(config.output.results_dir, PathBuf::from("/scratch/results"));
        },
    );
}

#[test]
#[serial(tillicum_env)]
fn custom_index_variable_is_honoured() {
    let file = write_config("[job]\nindex_env = \"PBS_ARRAY_INDEX\"\n");
    temp_env::with_vars(
        [("PBS_ARRAY_INDEX", Some("9")), ("SLURM_ARRAY_TASK_ID", Some("1"))],
        || {
            let config =
                ConfigBuilder::from_file(file.path()).unwrap().with_env().unwrap().build().unwrap();
            assert_eq!(config.job.index, 9);
        },
    );
}

#[test]
#[serial(tillicum_env)]
fn missing_index_variable_defaults_to_zero() {
    temp_env::with_var("SLURM_ARRAY_TASK_ID", None::<&str>, || {
        let config = ConfigBuilder::new().with_env().unwrap().build().unwrap();
        assert_eq!(config.job.index, 0);
    });
}

#[test]
#[serial(tillicum_env)]
fn malformed_matrix_size_env_is_rejected() {
    temp_env::with_var(MATRIX_SIZE_ENV, Some("huge"), || {
        let err = ConfigBuilder::new().with_env().unwrap_err();
        assert!(err.to_string().contains("job.matrix_size"));
    });
}

#[test]
#[serial(tillicum_env)]
fn explicit_overrides_beat_env() {
    temp_env::with_var("SLURM_ARRAY_TASK_ID", Some("2"), || {
        let config = ConfigBuilder::new()
            .with_env()
            .unwrap()
            .job_index(Some(11))
            .result_format(Some(ResultFormat::Json))
            .log_level(Some("debug".into()))
            .log_format(Some(LogFormat::Json))
            .build()
            .unwrap();
        assert_eq!(config.job.index, 11);
        assert_eq!(config.output.format, ResultFormat::Json);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    });
}

#[test]
fn zero_matrix_size_fails_validation() {
    let err = ConfigBuilder::new().matrix_size(Some(0)).build().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "job.matrix_size", .. }));
}

#[test]
fn negative_sleep_fails_validation() {
    let err = ConfigBuilder::new().simulate_work_secs(Some(-1.0)).build().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "job.simulate_work_secs", .. }));
}

#[test]
fn enum_parsing_is_case_insensitive() {
    assert_eq!("Cuda".parse::<DevicePreference>().unwrap(), DevicePreference::Cuda);
    assert_eq!(" json ".parse::<ResultFormat>().unwrap(), ResultFormat::Json);
    assert_eq!("COMPACT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    assert!("gpu".parse::<DevicePreference>().is_err());
}

#[test]
fn enum_display_round_trips_through_from_str() {
    for device in [DevicePreference::Auto, DevicePreference::Cpu, DevicePreference::Cuda] {
        assert_eq!(device.to_string().parse::<DevicePreference>().unwrap(), device);
    }
    assert_eq!(ResultFormat::Json.extension(), "json");
    assert_eq!(ResultFormat::Text.extension(), "txt");
}

#[test]
fn toml_output_reloads_to_same_config() {
    let config = ConfigBuilder::new().matrix_size(Some(128)).build().unwrap();
    let rendered = config.to_toml().unwrap();
    assert!(rendered.contains("[job]"));
    let file = write_config(&rendered);
    let reloaded = ConfigBuilder::from_file(file.path()).unwrap().build().unwrap();
    assert_eq!(reloaded, config);
}
