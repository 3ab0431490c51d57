use super::*;
use crate::dsl::parse_spec;
use reprotest_shell::ast::{Command, Word};
use std::collections::HashSet;
use std::path::PathBuf;

fn base() -> Build {
    Build::new(
        Command::new(Word::raw("sh")).arg(Word::raw("-ec")).arg(Word::literal("make")),
        PathBuf::from("/testbed/build/"),
        PathBuf::from("/testbed/aux/"),
    )
}

fn ctx() -> PlanContext {
    PlanContext::new(PathBuf::from("/src"), HashSet::new(), 1)
}

#[test]
fn empty_spec_plans_the_control_build_unchanged() {
    let out = plan(&ctx(), base(), &VariationSpec::new()).unwrap();
    assert_eq!(out.build_command.render(), base().build_command.render());
}

#[test]
fn enabled_variation_visibly_changes_the_build() {
    let spec = parse_spec("+umask").unwrap();
    let out = plan(&ctx(), base(), &spec).unwrap();
    let rendered: Vec<_> = out.setup.iter().map(Command::render).collect();
    assert!(rendered.iter().any(|c| c.starts_with("umask")));
}

#[test]
fn unknown_variation_in_spec_is_rejected_before_planning() {
    // A spec built through parse_spec can never contain an unknown name, so
    // exercise the planner's own guard directly with a hand-built map.
    let mut spec = VariationSpec::new();
    spec.insert("not_a_real_variation".to_string(), crate::variation::VariationConfig::Umask(true));
    let err = plan(&ctx(), base(), &spec).unwrap_err();
    assert!(matches!(err, PlanError::UnknownVariation(_)));
}

#[test]
fn planning_is_deterministic_for_a_fixed_seed_and_spec() {
    let spec = parse_spec("+umask,+home,+timezone").unwrap();
    let a = plan(&ctx(), base(), &spec).unwrap();
    let b = plan(&ctx(), base(), &spec).unwrap();
    assert_eq!(a.render_script(true), b.render_script(true));
}
