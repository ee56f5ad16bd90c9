//! Wallpaper target surfaces

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which surface a wallpaper apply affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Home,
    Lock,
    Both,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Home => "home",
            Target::Lock => "lock",
            Target::Both => "both",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Target::Home),
            "lock" => Ok(Target::Lock),
            "both" => Ok(Target::Both),
            other => Err(format!("unknown target '{}'", other)),
        }
    }
}
