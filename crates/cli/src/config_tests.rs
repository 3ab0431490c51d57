use super::*;

fn base_cli() -> Cli {
    Cli {
        source_root_or_build_command: None,
        artifact_pattern: None,
        virtual_server_args: Vec::new(),
        config_file: None,
        verbosity: 0,
        verbose: 0,
        host_distro: "debian".to_string(),
        source_root_flag: None,
        source_pattern: None,
        build_command_flag: None,
        store_dir: None,
        variations: "+all".to_string(),
        vary: Vec::new(),
        dont_vary: Vec::new(),
        extra_build: Vec::new(),
        auto_build: false,
        diffoscope_arg: Vec::new(),
        no_diffoscope: false,
        testbed_pre: None,
        testbed_init: None,
        no_clean_on_error: false,
        dry_run: false,
    }
}

#[test]
fn load_parses_a_minimal_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reprotest.toml");
    std::fs::write(&path, "variations = \"+time\"\nno_diffoscope = true\n").unwrap();

    let config = load(path.to_str().unwrap()).unwrap();
    assert_eq!(config.variations.as_deref(), Some("+time"));
    assert_eq!(config.no_diffoscope, Some(true));
}

#[test]
fn load_reports_missing_file() {
    let err = load("/nonexistent/reprotest.toml").unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn merge_backfills_only_still_default_fields() {
    let mut cli = base_cli();
    cli.host_distro = "arch".to_string(); // explicitly overridden
    let config = FileConfig { variations: Some("+time".to_string()), host_distro: Some("debian".to_string()), ..Default::default() };

    merge(&mut cli, &config);

    assert_eq!(cli.variations, "+time");
    assert_eq!(cli.host_distro, "arch");
}
