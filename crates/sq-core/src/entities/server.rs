use serde::{Deserialize, Serialize};

use crate::enums::Edition;
use crate::version::Version;

/// Version and edition of the server, fetched once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub version: Version,
    pub edition: Edition,
}

impl ServerInfo {
    #[must_use]
    pub const fn new(version: Version, edition: Edition) -> Self {
        Self { version, edition }
    }
}
