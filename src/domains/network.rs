use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The network the surrounding application currently has selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    Local,
    Other(String),
}

impl Network {
    pub fn as_str(&self) -> &str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
            Network::Other(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let name = value.trim().to_lowercase();
        Ok(match name.as_str() {
            "mainnet" => Network::Mainnet,
            "testnet" => Network::Testnet,
            "devnet" => Network::Devnet,
            "local" => Network::Local,
            _ => Network::Other(name),
        })
    }
}

impl From<String> for Network {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(network) => network,
            Err(never) => match never {},
        }
    }
}

impl From<Network> for String {
    fn from(value: Network) -> Self {
        value.as_str().to_string()
    }
}
