//! Server protocol versions and the minimum-version gate.
//!
//! Connect servers report their version through the
//! [`VERSION_HEADER`] response header. Servers released before that header
//! existed send nothing, in which case the version is estimated as
//! [`FLOOR_VERSION`] and flagged as such.

use std::fmt;
use std::str::FromStr;

use hyper::Response;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConnectResult, Error};

/// Response header carrying the server's dotted-triple version.
pub const VERSION_HEADER: &str = "1Password-Connect-Version";

/// Last server release that did not send [`VERSION_HEADER`].
pub const FLOOR_VERSION: Version = Version::new(1, 2, 0);

/// First server release that supports the files endpoints.
pub const FILES_MINIMUM_VERSION: Version = Version::new(1, 3, 0);

static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").expect("valid version pattern"));

/// A `major.minor.patch` server version.
///
/// Ordering is lexicographic on (major, minor, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl Version {
    /// Builds a version from its three components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// True if `self` is the same release as `other` or a later one.
    pub fn is_greater_or_equal_than(&self, other: &Version) -> bool {
        self >= other
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedVersion(s.to_string());

        let caps = VERSION_PATTERN.captures(s.trim()).ok_or_else(malformed)?;

        let component = |idx: usize| -> ConnectResult<u32> {
            caps[idx].parse::<u32>().map_err(|_| malformed())
        };

        Ok(Version::new(component(1)?, component(2)?, component(3)?))
    }
}

/// The version a server reported, or the floor estimate when it reported none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerVersion {
    version: Version,
    or_earlier: bool,
}

impl ServerVersion {
    /// The reported (or estimated) version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// True when no header was sent and [`version`](Self::version) is only
    /// an upper bound on the server's real capabilities.
    pub fn or_earlier(&self) -> bool {
        self.or_earlier
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.or_earlier {
            write!(f, "{} or earlier", self.version)
        } else {
            write!(f, "{}", self.version)
        }
    }
}

/// Reads the server version from a response.
///
/// A missing (or empty) header yields [`FLOOR_VERSION`] with
/// [`or_earlier`](ServerVersion::or_earlier) set. A header that is not three
/// dot-separated integers fails with [`Error::MalformedVersion`].
pub fn read_server_version<B>(response: &Response<B>) -> ConnectResult<ServerVersion> {
    let raw = match response.headers().get(VERSION_HEADER) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| {
            Error::MalformedVersion(String::from_utf8_lossy(value.as_bytes()).into_owned())
        })?),
    };

    match raw {
        None | Some("") => Ok(ServerVersion {
            version: FLOOR_VERSION,
            or_earlier: true,
        }),
        Some(raw) => Ok(ServerVersion {
            version: raw.parse()?,
            or_earlier: false,
        }),
    }
}

/// Fails with [`Error::VersionTooLow`] when the server behind `response` is
/// older than `minimum`.
///
/// An unparseable header does not block the call: the requirement is treated
/// as unverifiable and the call goes ahead.
pub fn require_minimum_version<B>(response: &Response<B>, minimum: Version) -> ConnectResult<()> {
    let server = match read_server_version(response) {
        Ok(server) => server,
        Err(err) => {
            warn!("cannot verify server version is at least {}: {}", minimum, err);
            return Ok(());
        }
    };

    if server.version.is_greater_or_equal_than(&minimum) {
        Ok(())
    } else {
        Err(Error::VersionTooLow { server, minimum })
    }
}
