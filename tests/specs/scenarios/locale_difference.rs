//! E4: with only `locales` varying, `$LANG` differs between control and
//! experiment, so the build is unreproducible.

use crate::prelude::*;

#[test]
fn lang_dependent_output_with_only_locales_varying_is_unreproducible() {
    let project = Project::empty();
    project
        .reprotest()
        .args(&["printf '%s' \"$LANG\" > artifact", "artifact", "--variations", "+locales"])
        .fails()
        .exit_code(1);
}
