use super::*;
use crate::variation::{PlanContext, VariationConfig};
use indexmap::IndexSet;
use std::collections::HashSet;
use std::path::PathBuf;

fn ctx() -> PlanContext {
    PlanContext::new(PathBuf::from("/src"), HashSet::new(), 42)
}

fn ctx_with_tool(tool: &str) -> PlanContext {
    PlanContext::new(PathBuf::from("/src"), HashSet::from([tool.to_string()]), 1)
}

fn build() -> Build {
    Build::new(
        Command::new(Word::raw("sh")).arg(Word::raw("-ec")).arg(Word::literal("make")),
        PathBuf::from("/testbed/build-control/"),
        PathBuf::from("/testbed/aux-control/"),
    )
}

#[test]
fn environment_capture_sets_from_ambient() {
    std::env::set_var("REPROTEST_TRANSFORM_TEST_VAR", "hello");
    let mut templates = IndexSet::new();
    templates.insert(EnvTemplate::Capture("REPROTEST_TRANSFORM_TEST_VAR".to_string()));
    let out = environment(&ctx(), build(), true, &VariationConfig::Environment(templates)).unwrap();
    assert_eq!(out.env.get("REPROTEST_TRANSFORM_TEST_VAR"), Some(&Some("hello".to_string())));
}

#[test]
fn environment_unset_records_none() {
    let mut templates = IndexSet::new();
    templates.insert(EnvTemplate::Unset("FOO".to_string()));
    let out = environment(&ctx(), build(), true, &VariationConfig::Environment(templates)).unwrap();
    assert_eq!(out.env.get("FOO"), Some(&None));
}

#[test]
fn environment_no_vary_is_noop() {
    let out = environment(&ctx(), build(), false, &VariationConfig::Environment(IndexSet::new())).unwrap();
    assert!(out.env.is_empty());
}

#[test]
fn build_path_control_moves_tree_to_fixed_path() {
    let out = build_path(&ctx(), build(), false, &VariationConfig::BuildPath(false)).unwrap();
    assert_eq!(out.tree, PathBuf::from("/testbed/const_build_path"));
    assert!(!out.setup.is_empty());
    assert!(!out.cleanup.is_empty());
}

#[test]
fn build_path_experiment_leaves_tree_alone() {
    let original = build();
    let out = build_path(&ctx(), original.clone(), true, &VariationConfig::BuildPath(true)).unwrap();
    assert_eq!(out.tree, original.tree);
    assert!(out.setup.is_empty());
}

#[test]
fn home_control_uses_tree_as_home() {
    let out = home(&ctx(), build(), false, &VariationConfig::Home(false)).unwrap();
    assert_eq!(out.env.get("HOME"), Some(&Some("/testbed/build-control/".to_string())));
}

#[test]
fn home_experiment_uses_nonexistent() {
    let out = home(&ctx(), build(), true, &VariationConfig::Home(true)).unwrap();
    assert_eq!(out.env.get("HOME"), Some(&Some("/nonexistent/second-build".to_string())));
}

#[test]
fn timezone_control_and_experiment_are_26_hours_apart() {
    let control = timezone(&ctx(), build(), false, &VariationConfig::Timezone(false)).unwrap();
    let experiment = timezone(&ctx(), build(), true, &VariationConfig::Timezone(true)).unwrap();
    assert_eq!(control.env.get("TZ"), Some(&Some("GMT+12".to_string())));
    assert_eq!(experiment.env.get("TZ"), Some(&Some("GMT-14".to_string())));
}

#[test]
fn umask_prepends_to_front_of_setup() {
    let b = build().append_setup(Command::new(Word::raw("mkdir")).arg(Word::raw("aux")));
    let out = umask(&ctx(), b, false, &VariationConfig::Umask(false)).unwrap();
    let rendered: Vec<_> = out.setup.iter().map(Command::render).collect();
    assert_eq!(rendered[0], "umask 0022");
}

#[test]
fn locales_control_is_deterministic() {
    let out = locales(&ctx(), build(), false, &VariationConfig::Locales(false)).unwrap();
    assert_eq!(out.env.get("LANG"), Some(&Some("C.UTF-8".to_string())));
}

#[test]
fn locales_experiment_picks_from_fixed_set() {
    let out = locales(&ctx(), build(), true, &VariationConfig::Locales(true)).unwrap();
    let lang = out.env.get("LANG").unwrap().clone().unwrap();
    assert!(VARY_LOCALES.contains(&lang.as_str()));
}

#[test]
fn user_group_with_empty_available_warns_and_noops() {
    let out = user_group(&ctx(), build(), true, &VariationConfig::UserGroup(IndexSet::new())).unwrap();
    assert!(out.setup.is_empty());
}

#[test]
fn user_group_picks_excluding_current() {
    let mut available = IndexSet::new();
    available.insert("builder:builder".to_string());
    let context = ctx().with_current_user_group("builder:builder");
    let out = user_group(&context, build(), true, &VariationConfig::UserGroup(available)).unwrap();
    // the only candidate equals current, so it is excluded and this becomes a no-op
    assert!(out.setup.is_empty());
}

#[test]
fn time_uses_relative_offset_for_recent_timestamps() {
    let mut faketimes = IndexSet::new();
    faketimes.insert("@1".to_string()); // epoch+1s, always "far in the past"
    let context = ctx_with_tool("faketime");
    let out = time(
        &context,
        build(),
        true,
        &VariationConfig::Time { faketimes, auto_faketimes: IndexSet::new() },
    )
    .unwrap();
    let rendered = out.build_command.render();
    assert!(rendered.contains("@1"), "epoch+1 is far in the past, should be used as-is: {rendered}");
}

#[test]
fn fileordering_without_tool_warns_and_noops() {
    let out = fileordering(&ctx(), build(), true, &VariationConfig::FileOrdering(true)).unwrap();
    assert!(out.setup.is_empty());
}

#[test]
fn fileordering_with_tool_mounts_disorderfs() {
    let out = fileordering(&ctx_with_tool("disorderfs"), build(), true, &VariationConfig::FileOrdering(true)).unwrap();
    let rendered: Vec<_> = out.setup.iter().map(Command::render).collect();
    assert!(rendered.iter().any(|c| c.contains("disorderfs")));
}
