//! Per-compiler-family job expansion.
//!
//! Each family turns a version list and an architecture list into one job
//! per (version, architecture) pair, versions outermost.

use crate::settings::DEFAULT_ARCH;
use cimatrix_core::{Compiler, JobSpec};

const LINUX_IMAGE: &str = "ubuntu-18.04";

pub fn gcc_jobs(archs: &[String], versions: &[String]) -> Vec<JobSpec> {
    expand(archs, versions, |version, arch| {
        let job = JobSpec::new(format!("GCC {}", version), Compiler::Gcc, version, LINUX_IMAGE)
            .with_docker_image(docker_image("gcc", version, arch));
        Some(for_arch(job, arch))
    })
}

pub fn clang_jobs(archs: &[String], versions: &[String]) -> Vec<JobSpec> {
    expand(archs, versions, |version, arch| {
        let job = JobSpec::new(
            format!("CLANG {}", version),
            Compiler::Clang,
            version,
            LINUX_IMAGE,
        )
        .with_docker_image(docker_image("clang", version, arch));
        Some(for_arch(job, arch))
    })
}

/// Apple-Clang jobs; 32-bit x86 is not available on macOS.
pub fn mac_jobs(archs: &[String], versions: &[String]) -> Vec<JobSpec> {
    expand(archs, versions, |version, arch| {
        if arch == "x86" {
            return None;
        }
        let os = match major(version) {
            Some(major) if major < 12 => "macos-10.15",
            Some(_) => "macos-11",
            None => "macos-latest",
        };
        let job = JobSpec::new(
            format!("macOS Apple-Clang {}", version),
            Compiler::AppleClang,
            version,
            os,
        );
        Some(for_arch(job, arch))
    })
}

pub fn win_jobs(archs: &[String], versions: &[String]) -> Vec<JobSpec> {
    expand(archs, versions, |version, arch| {
        let (year, os) = match major(version) {
            Some(14) => ("2015", "windows-2016"),
            Some(15) => ("2017", "windows-2016"),
            Some(16) => ("2019", "windows-2019"),
            Some(m) if m >= 17 => ("2022", "windows-2022"),
            _ => (version, "windows-latest"),
        };
        let job = JobSpec::new(
            format!("Windows VS {}", year),
            Compiler::Visual,
            version,
            os,
        );
        Some(for_arch(job, arch))
    })
}

fn expand<F>(archs: &[String], versions: &[String], job: F) -> Vec<JobSpec>
where
    F: Fn(&str, &str) -> Option<JobSpec>,
{
    versions
        .iter()
        .flat_map(|version| archs.iter().map(move |arch| (version, arch)))
        .filter_map(|(version, arch)| job(version, arch))
        .collect()
}

fn for_arch(job: JobSpec, arch: &str) -> JobSpec {
    if arch == DEFAULT_ARCH {
        job
    } else {
        job.with_arch(arch)
    }
}

fn docker_image(family: &str, version: &str, arch: &str) -> String {
    let mut image = format!("conanio/{}{}", family, version.replace('.', ""));
    if arch != DEFAULT_ARCH {
        image.push('-');
        image.push_str(arch);
    }
    image
}

fn major(version: &str) -> Option<u32> {
    version.split('.').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn names(jobs: &[JobSpec]) -> Vec<&str> {
        jobs.iter().map(|j| j.name.as_str()).collect()
    }

    #[test]
    fn test_gcc_versions_outer_archs_inner() {
        let jobs = gcc_jobs(&strings(&["x86_64", "x86"]), &strings(&["7", "9"]));

        assert_eq!(names(&jobs), vec!["GCC 7", "GCC 7 x86", "GCC 9", "GCC 9 x86"]);
        assert_eq!(jobs[0].docker_image.as_deref(), Some("conanio/gcc7"));
        assert_eq!(jobs[1].docker_image.as_deref(), Some("conanio/gcc7-x86"));
        assert_eq!(jobs[1].arch.as_deref(), Some("x86"));
        assert_eq!(jobs[0].arch, None);
    }

    #[test]
    fn test_clang_image_drops_dots() {
        let jobs = clang_jobs(&strings(&["x86_64"]), &strings(&["3.9"]));
        assert_eq!(jobs[0].docker_image.as_deref(), Some("conanio/clang39"));
        assert_eq!(jobs[0].compiler, Compiler::Clang);
    }

    #[test]
    fn test_mac_skips_x86() {
        let jobs = mac_jobs(&strings(&["x86_64", "x86"]), &strings(&["11.0", "12.0"]));

        assert_eq!(
            names(&jobs),
            vec!["macOS Apple-Clang 11.0", "macOS Apple-Clang 12.0"]
        );
        assert_eq!(jobs[0].os, "macos-10.15");
        assert_eq!(jobs[1].os, "macos-11");
    }

    #[test]
    fn test_windows_years() {
        let jobs = win_jobs(&strings(&["x86_64"]), &strings(&["15", "16", "17"]));

        assert_eq!(
            names(&jobs),
            vec!["Windows VS 2017", "Windows VS 2019", "Windows VS 2022"]
        );
        assert_eq!(jobs[0].os, "windows-2016");
        assert_eq!(jobs[2].os, "windows-2022");
        assert!(jobs.iter().all(|j| j.docker_image.is_none()));
    }

    #[test]
    fn test_windows_unknown_old_version() {
        let jobs = win_jobs(&strings(&["x86_64"]), &strings(&["12", "next"]));

        assert_eq!(names(&jobs), vec!["Windows VS 12", "Windows VS next"]);
        assert!(jobs.iter().all(|j| j.os == "windows-latest"));
    }

    #[test]
    fn test_empty_lists() {
        assert!(gcc_jobs(&strings(&["x86_64"]), &[]).is_empty());
        assert!(win_jobs(&[], &strings(&["16"])).is_empty());
    }
}
