//! Fixed job catalogs.
//!
//! Jobs that do not depend on the environment-supplied compiler lists.

use cimatrix_core::{Compiler, JobSpec};

/// Installer recipes: one job per OS family.
pub fn installer() -> Vec<JobSpec> {
    vec![
        JobSpec::new("Installer Linux", Compiler::Gcc, "7", "ubuntu-18.04")
            .with_docker_image("conanio/gcc7"),
        JobSpec::new("Installer Windows", Compiler::Visual, "16", "windows-2019"),
        JobSpec::new("Installer macOS", Compiler::AppleClang, "11.0", "macos-10.15"),
    ]
}

/// Unconditional header-only recipes.
pub fn header_only() -> Vec<JobSpec> {
    vec![
        JobSpec::new("Header-only Linux", Compiler::Clang, "8", "ubuntu-18.04"),
        JobSpec::new("Header-only Windows", Compiler::Visual, "16", "windows-latest"),
    ]
}

/// Reduced matrix for `minimal` versions on the array platform.
pub fn minimal(run_macos: bool, run_windows: bool) -> Vec<JobSpec> {
    let mut jobs = vec![
        JobSpec::new("GCC 7", Compiler::Gcc, "7", "ubuntu-18.04"),
        JobSpec::new("CLANG 8", Compiler::Clang, "8", "ubuntu-18.04"),
    ];
    if run_macos {
        jobs.push(JobSpec::new(
            "macOS Apple-Clang 11",
            Compiler::AppleClang,
            "11.0",
            "macOS-10.15",
        ));
    }
    if run_windows {
        jobs.push(JobSpec::new(
            "Windows VS 2019",
            Compiler::Visual,
            "16",
            "windows-2019",
        ));
    }
    jobs
}

/// Full matrix on the map platform.
pub fn map_full() -> Vec<JobSpec> {
    vec![
        JobSpec::new("macOS Apple-Clang 10", Compiler::AppleClang, "10.0", "macOS-10.15"),
        JobSpec::new("macOS Apple-Clang 11", Compiler::AppleClang, "11.0", "macOS-10.15"),
        JobSpec::new("macOS Apple-Clang 12", Compiler::AppleClang, "12.0", "macOS-10.15"),
        JobSpec::new("Windows VS 2017", Compiler::Visual, "15", "vs2017-win2016"),
        JobSpec::new("Windows VS 2019", Compiler::Visual, "16", "windows-2019"),
    ]
}

/// Minimal matrix on the map platform.
pub fn map_minimal() -> Vec<JobSpec> {
    vec![
        JobSpec::new("macOS Apple-Clang 11", Compiler::AppleClang, "11.0", "macOS-10.15"),
        JobSpec::new("Windows VS 2019", Compiler::Visual, "16", "windows-2019"),
    ]
}
