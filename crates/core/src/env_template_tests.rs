use super::*;
use std::str::FromStr;

#[test]
fn bare_name_is_capture() {
    assert_eq!(EnvTemplate::from_str("LANG").unwrap(), EnvTemplate::Capture("LANG".to_string()));
}

#[test]
fn name_equals_value_is_set() {
    assert_eq!(
        EnvTemplate::from_str("LANG=C.UTF-8").unwrap(),
        EnvTemplate::Set("LANG".to_string(), "C.UTF-8".to_string())
    );
}

#[test]
fn name_equals_nothing_is_unset() {
    assert_eq!(EnvTemplate::from_str("LANG=").unwrap(), EnvTemplate::Unset("LANG".to_string()));
}

#[test]
fn value_may_itself_contain_equals() {
    assert_eq!(
        EnvTemplate::from_str("FOO=a=b").unwrap(),
        EnvTemplate::Set("FOO".to_string(), "a=b".to_string())
    );
}

#[test]
fn name_reads_back_regardless_of_shape() {
    assert_eq!(EnvTemplate::from_str("FOO").unwrap().name(), "FOO");
    assert_eq!(EnvTemplate::from_str("FOO=bar").unwrap().name(), "FOO");
    assert_eq!(EnvTemplate::from_str("FOO=").unwrap().name(), "FOO");
}

#[test]
fn display_round_trips_through_from_str() {
    for s in ["LANG", "LANG=C.UTF-8", "LANG="] {
        let parsed = EnvTemplate::from_str(s).unwrap();
        assert_eq!(parsed.to_string(), s);
    }
}
