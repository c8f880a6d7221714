use std::{fmt, str::FromStr};

/// A dotted version number of two to four components.
///
/// Renders as `major.minor[.build[.revision]]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    pub const fn with_build(mut self, build: u32) -> Self {
        self.build = Some(build);
        self
    }

    pub const fn with_revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
            if let Some(revision) = self.revision {
                write!(f, ".{revision}")?;
            }
        }
        Ok(())
    }
}

/// Error returned when parsing a malformed [`Version`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed version string `{0}`")]
pub struct ParseVersionError(String);

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_owned());

        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts[..] {
            [major, minor] => Ok(Version::new(major, minor)),
            [major, minor, build] => Ok(Version::new(major, minor).with_build(build)),
            [major, minor, build, revision] => Ok(Version::new(major, minor)
                .with_build(build)
                .with_revision(revision)),
            _ => Err(err()),
        }
    }
}
