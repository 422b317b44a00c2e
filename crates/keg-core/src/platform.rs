//! Target platform model: operating system x CPU architecture.
//!
//! Formula artifacts are keyed by a `Platform`. Parsing accepts the spellings
//! used by release asset names and by Homebrew (`darwin`, `arm64`, `intel`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    #[serde(alias = "darwin", alias = "osx")]
    Macos,
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    #[serde(alias = "amd64", alias = "intel", alias = "x64")]
    X86_64,
    #[serde(alias = "arm64", alias = "arm")]
    Aarch64,
}

/// An (OS, architecture) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

/// Returned when a platform string names an OS or architecture keg does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParsePlatformError {
    kind: &'static str,
    value: String,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Macos => "macos",
            Os::Linux => "linux",
        }
    }

    /// Host OS, if it is one keg installs for.
    pub fn current() -> Option<Os> {
        std::env::consts::OS.parse().ok()
    }
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        }
    }

    pub fn current() -> Option<Arch> {
        std::env::consts::ARCH.parse().ok()
    }
}

impl Platform {
    /// Every platform keg knows how to install for.
    pub const ALL: [Platform; 4] = [
        Platform::new(Os::Macos, Arch::X86_64),
        Platform::new(Os::Macos, Arch::Aarch64),
        Platform::new(Os::Linux, Arch::X86_64),
        Platform::new(Os::Linux, Arch::Aarch64),
    ];

    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The running host, or `None` if it is outside the supported set.
    pub fn current() -> Option<Platform> {
        Some(Platform::new(Os::current()?, Arch::current()?))
    }

    /// Rust target triple used in release asset names.
    pub fn target_triple(self) -> &'static str {
        match (self.arch, self.os) {
            (Arch::X86_64, Os::Macos) => "x86_64-apple-darwin",
            (Arch::Aarch64, Os::Macos) => "aarch64-apple-darwin",
            (Arch::X86_64, Os::Linux) => "x86_64-unknown-linux-gnu",
            (Arch::Aarch64, Os::Linux) => "aarch64-unknown-linux-gnu",
        }
    }
}

impl FromStr for Os {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "osx" => Ok(Os::Macos),
            "linux" => Ok(Os::Linux),
            other => Err(ParsePlatformError {
                kind: "os",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for Arch {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "intel" | "x64" => Ok(Arch::X86_64),
            "aarch64" | "arm64" | "arm" => Ok(Arch::Aarch64),
            other => Err(ParsePlatformError {
                kind: "architecture",
                value: other.to_string(),
            }),
        }
    }
}

/// Parses `<os>-<arch>` or `<os>/<arch>` (e.g. `linux-x86_64`, `macos/arm64`).
impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (os, arch) = s
            .split_once(['/', '-'])
            .ok_or_else(|| ParsePlatformError {
                kind: "platform",
                value: s.to_string(),
            })?;
        Ok(Platform::new(os.parse()?, arch.parse()?))
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aliases() {
        assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("Linux".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!("arm64".parse::<Arch>().unwrap(), Arch::Aarch64);
        assert_eq!("amd64".parse::<Arch>().unwrap(), Arch::X86_64);
        assert!("windows".parse::<Os>().is_err());
        assert!("riscv64".parse::<Arch>().is_err());
    }

    #[test]
    fn parse_platform_pair() {
        let p: Platform = "linux-x86_64".parse().unwrap();
        assert_eq!(p, Platform::new(Os::Linux, Arch::X86_64));
        let p: Platform = "macos/arm64".parse().unwrap();
        assert_eq!(p, Platform::new(Os::Macos, Arch::Aarch64));
        assert!("linux".parse::<Platform>().is_err());
    }

    #[test]
    fn target_triples_are_distinct() {
        let triples: std::collections::HashSet<_> =
            Platform::ALL.iter().map(|p| p.target_triple()).collect();
        assert_eq!(triples.len(), 4);
        assert_eq!(
            Platform::new(Os::Linux, Arch::X86_64).target_triple(),
            "x86_64-unknown-linux-gnu"
        );
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for p in Platform::ALL {
            assert_eq!(p.to_string().parse::<Platform>().unwrap(), p);
        }
    }

    #[test]
    fn serde_accepts_aliases() {
        #[derive(Deserialize)]
        struct Row {
            os: Os,
            arch: Arch,
        }
        let row: Row = toml::from_str("os = \"darwin\"\narch = \"arm64\"").unwrap();
        assert_eq!(row.os, Os::Macos);
        assert_eq!(row.arch, Arch::Aarch64);
    }
}
