use super::*;
use reprotest_shell::ast::Word;

fn build() -> Build {
    Build::new(
        Command::new(Word::raw("sh")).arg(Word::raw("-ec")).arg(Word::literal("make")),
        PathBuf::from("/testbed/build/"),
        PathBuf::from("/testbed/aux/"),
    )
}

#[test]
fn new_build_has_empty_setup_cleanup_env() {
    let b = build();
    assert!(b.setup.is_empty());
    assert!(b.cleanup.is_empty());
    assert!(b.env.is_empty());
}

#[test]
fn set_env_records_some() {
    let b = build().set_env("HOME", "/nonexistent");
    assert_eq!(b.env.get("HOME"), Some(&Some("/nonexistent".to_string())));
}

#[test]
fn unset_env_records_none_distinct_from_absent() {
    let b = build().unset_env("FOO");
    assert_eq!(b.env.get("FOO"), Some(&None));
    assert_eq!(b.env.get("BAR"), None);
}

#[test]
fn prepend_setup_runs_before_appended_setup() {
    let b = build()
        .append_setup(Command::new(Word::raw("mkdir")).arg(Word::raw("aux")))
        .prepend_setup(Command::new(Word::raw("umask")).arg(Word::raw("0022")));
    let rendered: Vec<_> = b.setup.iter().map(Command::render).collect();
    assert_eq!(rendered, vec!["umask 0022", "mkdir aux"]);
}

#[test]
fn prepend_cleanup_undoes_most_recent_setup_first() {
    let b = build()
        .prepend_cleanup(Command::new(Word::raw("rm")).arg(Word::raw("-rf")).arg(Word::raw("first")))
        .prepend_cleanup(Command::new(Word::raw("rm")).arg(Word::raw("-rf")).arg(Word::raw("second")));
    let rendered: Vec<_> = b.cleanup.iter().map(Command::render).collect();
    assert_eq!(rendered[0], "rm -rf second");
}

#[test]
fn wrap_build_command_prepends_prefix_words() {
    let b = build().wrap_build_command([Word::raw("linux64"), Word::raw("--uname-2.6")]);
    assert_eq!(b.build_command.render(), "linux64 --uname-2.6 sh -ec 'make'");
}

#[test]
fn tree_with_sep_adds_trailing_slash_when_missing() {
    let mut b = build();
    b.tree = PathBuf::from("/testbed/build");
    assert_eq!(b.tree_with_sep(), "/testbed/build/");
}

#[test]
fn tree_with_sep_is_idempotent() {
    let b = build();
    assert_eq!(b.tree_with_sep(), "/testbed/build/");
}

#[test]
fn render_script_without_cleanup_on_error_omits_trap_echo() {
    let b = build().append_setup(Command::new(Word::raw("mkdir")).arg(Word::raw("aux")));
    let script = b.render_script(false);
    assert!(script.contains("run_build"));
    assert!(!script.contains("cleanup failed"));
}
