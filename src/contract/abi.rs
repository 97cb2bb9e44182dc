//! ABI documents and compiled artifacts supplied as external configuration

use std::path::Path;

use alloy_sol_types::SolCall;
use serde::Deserialize;

use super::bindings::{addToBlockchainCall, getAllTransactionsCall, getTransactionCountCall};
use super::ContractError;
use crate::api::wallet::decode_hex;

#[derive(Debug, Clone, Deserialize)]
pub struct AbiParam {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    /// Canonical type as used in function signatures; tuples are expanded
    fn canonical_type(&self) -> String {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                let inner: Vec<String> = self.components.iter().map(|c| c.canonical_type()).collect();
                format!("({}){}", inner.join(","), suffix)
            }
            None => self.kind.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
}

impl AbiItem {
    pub fn signature(&self) -> Option<String> {
        if self.kind != "function" {
            return None;
        }
        let name = self.name.as_deref()?;
        let inputs: Vec<String> = self.inputs.iter().map(|p| p.canonical_type()).collect();
        Some(format!("{}({})", name, inputs.join(",")))
    }
}

/// A Hardhat-style compiled contract artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    #[serde(default)]
    pub contract_name: Option<String>,
    pub abi: Vec<AbiItem>,
    #[serde(default)]
    pub bytecode: String,
}

impl ContractArtifact {
    /// Creation bytecode; an artifact of an interface or abstract contract has none
    pub fn creation_code(&self) -> Result<Vec<u8>, ContractError> {
        let code = decode_hex(&self.bytecode).map_err(|e| ContractError::InvalidDocument {
            path: self.contract_name.clone().unwrap_or_default(),
            reason: e.to_string(),
        })?;
        if code.is_empty() {
            return Err(ContractError::InvalidDocument {
                path: self.contract_name.clone().unwrap_or_default(),
                reason: "artifact has no bytecode".to_string(),
            });
        }
        Ok(code)
    }
}

/// An ABI file is either a bare ABI array or a full artifact
#[derive(Deserialize)]
#[serde(untagged)]
enum AbiDocument {
    Abi(Vec<AbiItem>),
    Artifact(ContractArtifact),
}

pub fn parse_abi(contents: &str) -> Result<Vec<AbiItem>, serde_json::Error> {
    Ok(match serde_json::from_str::<AbiDocument>(contents)? {
        AbiDocument::Abi(items) => items,
        AbiDocument::Artifact(artifact) => artifact.abi,
    })
}

pub fn load_abi(path: &Path) -> Result<Vec<AbiItem>, ContractError> {
    let contents = read_document(path)?;
    parse_abi(&contents).map_err(|e| ContractError::InvalidDocument {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn load_artifact(path: &Path) -> Result<ContractArtifact, ContractError> {
    let contents = read_document(path)?;
    serde_json::from_str(&contents).map_err(|e| ContractError::InvalidDocument {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// `TransferStruct` fields as `(type, name)`, in the order records are decoded
const RECORD_FIELDS: [(&str, &str); 6] = [
    ("address", "sender"),
    ("address", "receiver"),
    ("uint256", "timestamp"),
    ("string", "message"),
    ("string", "keyword"),
    ("uint256", "amount"),
];

/// Check that the ABI declares every function this client calls, and that the
/// views return what the bindings decode.
pub fn verify_abi(items: &[AbiItem]) -> Result<(), ContractError> {
    let required = [
        addToBlockchainCall::SIGNATURE,
        getAllTransactionsCall::SIGNATURE,
        getTransactionCountCall::SIGNATURE,
    ];
    for signature in required {
        find_function(items, signature)?;
    }

    let count = find_function(items, getTransactionCountCall::SIGNATURE)?;
    match count.outputs.as_slice() {
        [output] if output.kind == "uint256" => {}
        _ => {
            return Err(ContractError::AbiMismatch(format!(
                "{} returning uint256",
                getTransactionCountCall::SIGNATURE
            )))
        }
    }

    let records = find_function(items, getAllTransactionsCall::SIGNATURE)?;
    let matches_record = |output: &AbiParam| {
        output.kind == "tuple[]"
            && output.components.len() == RECORD_FIELDS.len()
            && output
                .components
                .iter()
                .zip(RECORD_FIELDS)
                .all(|(field, (kind, name))| field.kind == kind && field.name == name)
    };
    match records.outputs.as_slice() {
        [output] if matches_record(output) => Ok(()),
        _ => {
            let fields: Vec<String> = RECORD_FIELDS
                .iter()
                .map(|(kind, name)| format!("{} {}", kind, name))
                .collect();
            Err(ContractError::AbiMismatch(format!(
                "{} returning ({})[]",
                getAllTransactionsCall::SIGNATURE,
                fields.join(", ")
            )))
        }
    }
}

fn find_function<'a>(items: &'a [AbiItem], signature: &str) -> Result<&'a AbiItem, ContractError> {
    items
        .iter()
        .find(|item| item.signature().as_deref() == Some(signature))
        .ok_or_else(|| ContractError::AbiMismatch(signature.to_string()))
}

fn read_document(path: &Path) -> Result<String, ContractError> {
    std::fs::read_to_string(path).map_err(|e| ContractError::InvalidDocument {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
