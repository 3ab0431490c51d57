// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `--host-distro` presets: convenience defaults for `build_command="auto"`,
//! grounded in the upstream `presets.py::PRESET_DEB_DIR`/`preset_deb_schroot`
//! family. Only the Debian preset carries real defaults; every other distro
//! name is accepted but resolves to no defaults (the user must supply
//! `--build-command`/`-c` explicitly).

pub struct Preset {
    pub build_command: &'static str,
    pub artifact_pattern: &'static str,
    pub testbed_init: Option<&'static str>,
}

/// Resolve a preset for `host_distro` when `build_command` was left as the
/// `auto` sentinel. Returns `None` for distros with no known preset.
pub fn resolve(host_distro: &str) -> Option<Preset> {
    match host_distro {
        "debian" | "ubuntu" | "deb" => Some(Preset {
            build_command: "dpkg-buildpackage --no-sign -b",
            artifact_pattern: "../*.deb",
            testbed_init: Some(
                "apt-get -y --no-install-recommends install disorderfs faketime locales-all sudo util-linux",
            ),
        }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "presets_tests.rs"]
mod tests;
