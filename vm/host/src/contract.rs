// Copyright (c) 2026 Vouch Foundation

use serde::{Deserialize, Serialize};

use crate::HostError;

/// An exposed contract entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abi {
    pub name: String,
    pub payment: i32,
    pub args: Vec<String>,
}

impl Abi {
    pub fn new(name: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            payment: 0,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// The implicit constructor entry every deployed contract exposes.
    pub fn init() -> Self {
        Self::new("init", &[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub lang: String,
    pub version: String,
    pub abis: Vec<Abi>,
}

/// A deployable contract: source or bytecode plus its interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub code: String,
    pub info: ContractInfo,
}

impl Contract {
    pub fn new(id: &str, code: &str, abis: Vec<Abi>) -> Self {
        Self {
            id: id.to_string(),
            code: code.to_string(),
            info: ContractInfo {
                lang: "javascript".to_string(),
                version: "1.0.0".to_string(),
                abis,
            },
        }
    }

    pub fn abi(&self, name: &str) -> Option<&Abi> {
        self.info.abis.iter().find(|a| a.name == name)
    }

    /// Add `abi` unless an entry with the same name is already exposed.
    pub fn ensure_abi(&mut self, abi: Abi) {
        if self.abi(&abi.name).is_none() {
            self.info.abis.push(abi);
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, HostError> {
        bincode::serialize(self).map_err(|e| HostError::Serialization(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, HostError> {
        bincode::deserialize(bytes).map_err(|e| HostError::Serialization(e.to_string()))
    }
}
