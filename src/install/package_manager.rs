//! Package manager detection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Environment variable forcing a package manager.
pub const PACKAGE_MANAGER_ENV: &str = "STENCIL_PACKAGE_MANAGER";

/// Detected JavaScript package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

/// Lockfiles in detection order.
const LOCKFILES: [(&str, PackageManager); 5] = [
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
];

impl PackageManager {
    /// Detect the package manager for a project.
    ///
    /// `STENCIL_PACKAGE_MANAGER` wins; otherwise the first lockfile found
    /// decides, and npm is the fallback.
    pub fn detect(project_root: &Path) -> Self {
        if let Some(pm) = std::env::var(PACKAGE_MANAGER_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
        {
            tracing::debug!("Package manager {} from {}", pm, PACKAGE_MANAGER_ENV);
            return pm;
        }
        Self::detect_from_lockfiles(project_root)
    }

    /// Detect from lockfiles only.
    pub fn detect_from_lockfiles(project_root: &Path) -> Self {
        LOCKFILES
            .iter()
            .find(|(file, _)| file_exists(project_root, file))
            .map(|(file, pm)| {
                tracing::debug!("Package manager {} from {}", pm, file);
                *pm
            })
            .unwrap_or(PackageManager::Npm)
    }

    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
            Self::Bun => "bun",
        }
    }

    /// Arguments that add `packages` to the project.
    pub fn add_args(&self, packages: &[String]) -> Vec<String> {
        let verb = match self {
            Self::Npm => "install",
            Self::Yarn | Self::Pnpm | Self::Bun => "add",
        };
        std::iter::once(verb.to_string())
            .chain(packages.iter().cloned())
            .collect()
    }

    /// Arguments that add `packages` as development dependencies.
    pub fn add_dev_args(&self, packages: &[String]) -> Vec<String> {
        let mut args = self.add_args(&[]);
        args.push("-D".to_string());
        args.extend(packages.iter().cloned());
        args
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            "pnpm" => Ok(Self::Pnpm),
            "bun" => Ok(Self::Bun),
            other => Err(format!("unknown package manager '{}'", other)),
        }
    }
}

fn file_exists(root: &Path, name: &str) -> bool {
    root.join(name).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn detect_defaults_to_npm() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            PackageManager::detect_from_lockfiles(temp.path()),
            PackageManager::Npm
        );
    }

    #[test]
    fn detect_from_each_lockfile() {
        let cases = [
            ("bun.lockb", PackageManager::Bun),
            ("bun.lock", PackageManager::Bun),
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("yarn.lock", PackageManager::Yarn),
            ("package-lock.json", PackageManager::Npm),
        ];
        for (file, expected) in cases {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join(file), "").unwrap();
            assert_eq!(
                PackageManager::detect_from_lockfiles(temp.path()),
                expected,
                "{}",
                file
            );
        }
    }

    #[test]
    fn bun_wins_over_other_lockfiles() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("yarn.lock"), "").unwrap();
        fs::write(temp.path().join("bun.lockb"), "").unwrap();
        assert_eq!(
            PackageManager::detect_from_lockfiles(temp.path()),
            PackageManager::Bun
        );
    }

    #[test]
    fn add_args_per_manager() {
        let packages = vec!["clsx".to_string(), "tailwind-merge".to_string()];
        assert_eq!(
            PackageManager::Npm.add_args(&packages),
            vec!["install", "clsx", "tailwind-merge"]
        );
        assert_eq!(PackageManager::Yarn.add_args(&packages)[0], "add");
        assert_eq!(PackageManager::Pnpm.add_args(&packages)[0], "add");
        assert_eq!(PackageManager::Bun.add_args(&packages)[0], "add");
    }

    #[test]
    fn dev_args_carry_the_dev_flag() {
        let packages = vec!["tw-animate-css".to_string()];
        assert_eq!(
            PackageManager::Npm.add_dev_args(&packages),
            vec!["install", "-D", "tw-animate-css"]
        );
        assert_eq!(
            PackageManager::Bun.add_dev_args(&packages),
            vec!["add", "-D", "tw-animate-css"]
        );
    }

    #[test]
    fn parse_names() {
        assert_eq!("PNPM".parse::<PackageManager>(), Ok(PackageManager::Pnpm));
        assert!("cargo".parse::<PackageManager>().is_err());
    }
}
