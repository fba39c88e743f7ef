//! Log categories tag the subsystem an entry originates from

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    #[default]
    General,
    Api,
    Transaction,
    Network,
    Error,
    Debug,
    Bridge,
    Wallet,
}

impl LogCategory {
    pub const ALL: [LogCategory; 8] = [
        LogCategory::General,
        LogCategory::Api,
        LogCategory::Transaction,
        LogCategory::Network,
        LogCategory::Error,
        LogCategory::Debug,
        LogCategory::Bridge,
        LogCategory::Wallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::General => "general",
            LogCategory::Api => "api",
            LogCategory::Transaction => "transaction",
            LogCategory::Network => "network",
            LogCategory::Error => "error",
            LogCategory::Debug => "debug",
            LogCategory::Bridge => "bridge",
            LogCategory::Wallet => "wallet",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid log category: '{}'", s))
    }
}
