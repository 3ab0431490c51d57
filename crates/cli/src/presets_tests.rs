use super::*;

#[test]
fn debian_preset_has_dpkg_buildpackage_command() {
    let preset = resolve("debian").unwrap();
    assert!(preset.build_command.contains("dpkg-buildpackage"));
    assert_eq!(preset.artifact_pattern, "../*.deb");
}

#[test]
fn unknown_distro_has_no_preset() {
    assert!(resolve("arch").is_none());
}
