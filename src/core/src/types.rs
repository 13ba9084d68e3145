//! Core types for the testnet faucet client.

use crate::errors::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// Token balance in the smallest on-chain unit.
pub type Balance = u128;

/// Maximum number of hex digits in an account address.
const ADDRESS_HEX_LEN: usize = 64;

/// An account address: `0x` followed by 1 to 64 hex digits, stored lowercase.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Returns the address as written, including the `0x` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the address left-padded to the full 64 hex digits.
    pub fn to_long_string(&self) -> String {
        format!("0x{:0>width$}", &self.0[2..], width = ADDRESS_HEX_LEN)
    }
}

impl FromStr for AccountAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| CoreError::InvalidAddress(format!("{} (missing 0x prefix)", s)))?;

        if digits.is_empty() || digits.len() > ADDRESS_HEX_LEN {
            return Err(CoreError::InvalidAddress(format!(
                "{} (expected 1 to {} hex digits)",
                s, ADDRESS_HEX_LEN
            )));
        }

        // hex::decode wants an even number of digits
        let padded = if digits.len() % 2 == 1 {
            format!("0{}", digits)
        } else {
            digits.to_string()
        };
        hex::decode(&padded).map_err(|e| CoreError::InvalidAddress(format!("{} ({})", s, e)))?;

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-facing asset symbol such as `USDt` or `APT`. Case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetSymbol(String);

impl AssetSymbol {
    /// Creates a new asset symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Returns the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetSymbol {
    fn from(symbol: &str) -> Self {
        Self(symbol.to_string())
    }
}

impl Borrow<str> for AssetSymbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A transaction hash as returned by the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a balance is read from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetDescriptor {
    /// A legacy coin, addressed by its Move type.
    Coin {
        /// The coin type, e.g. `0x1::aptos_coin::AptosCoin`
        coin_type: String,
    },
    /// A fungible asset, addressed by its metadata object.
    FungibleAsset {
        /// The metadata object address
        metadata: AccountAddress,
    },
}

/// An asset whose balance is shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedAsset {
    /// The user-facing symbol
    pub symbol: AssetSymbol,
    /// Where the balance is read from
    pub source: AssetDescriptor,
    /// Number of decimal places used when displaying the balance
    pub decimals: u32,
    /// A third-party faucet page for assets that cannot be minted here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_faucet: Option<String>,
}

/// Balances of one account at one point in time.
///
/// Every asset that was asked for has a value. A failed read is recorded as
/// zero and listed in `unavailable`.
#[derive(Clone, Debug)]
pub struct BalanceSnapshot {
    /// The account the balances belong to
    pub account: AccountAddress,
    /// When the reads completed
    pub taken_at: SystemTime,
    /// Refresh generation of the cache at the moment the reads started, zero
    /// for snapshots read outside a poller
    pub generation: u64,
    balances: BTreeMap<AssetSymbol, Balance>,
    unavailable: BTreeSet<AssetSymbol>,
}

impl BalanceSnapshot {
    /// Builds a snapshot from per-asset readings, `None` meaning the read failed.
    pub fn from_readings<I>(account: AccountAddress, readings: I) -> Self
    where
        I: IntoIterator<Item = (AssetSymbol, Option<Balance>)>,
    {
        let mut balances = BTreeMap::new();
        let mut unavailable = BTreeSet::new();
        for (symbol, reading) in readings {
            match reading {
                Some(amount) => {
                    balances.insert(symbol, amount);
                }
                None => {
                    balances.insert(symbol.clone(), 0);
                    unavailable.insert(symbol);
                }
            }
        }

        Self {
            account,
            taken_at: SystemTime::now(),
            generation: 0,
            balances,
            unavailable,
        }
    }

    /// Returns the balance of an asset, zero if it is unknown or its read failed.
    pub fn get(&self, symbol: &str) -> Balance {
        self.balances.get(symbol).copied().unwrap_or(0)
    }

    /// Returns true if the read for this asset failed.
    pub fn is_unavailable(&self, symbol: &str) -> bool {
        self.unavailable.contains(symbol)
    }

    /// Returns the symbols whose reads failed.
    pub fn unavailable(&self) -> impl Iterator<Item = &AssetSymbol> {
        self.unavailable.iter()
    }

    /// Iterates over all balances in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetSymbol, Balance)> {
        self.balances.iter().map(|(symbol, amount)| (symbol, *amount))
    }

    /// Returns the number of assets in the snapshot.
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Returns true if the snapshot holds no assets.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// A request for test tokens, built from form state at submit time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaucetRequest {
    /// The asset to mint or transfer
    pub asset: AssetSymbol,
    /// Who receives the tokens
    pub recipient: AccountAddress,
    /// The amount in human units
    pub amount: Decimal,
}

/// A fully qualified Move function: `<address>::<module>::<name>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FunctionId {
    /// The account that published the module
    pub address: AccountAddress,
    /// The module name
    pub module: String,
    /// The function name
    pub name: String,
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for FunctionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        if parts.len() != 3 {
            return Err(CoreError::InvalidFunctionId(format!(
                "{} (expected <address>::<module>::<function>)",
                s
            )));
        }

        let address = parts[0]
            .parse::<AccountAddress>()
            .map_err(|e| CoreError::InvalidFunctionId(format!("{}: {}", s, e)))?;
        if !is_identifier(parts[1]) || !is_identifier(parts[2]) {
            return Err(CoreError::InvalidFunctionId(format!(
                "{} (module and function must be identifiers)",
                s
            )));
        }

        Ok(Self {
            address,
            module: parts[1].to_string(),
            name: parts[2].to_string(),
        })
    }
}

impl TryFrom<String> for FunctionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FunctionId> for String {
    fn from(id: FunctionId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)
    }
}

/// A typed argument of a view call or transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveValue {
    /// An account address
    Address(AccountAddress),
    /// An unsigned 64-bit integer
    U64(u64),
    /// A UTF-8 string
    String(String),
}

// The REST API takes every argument as a JSON string, u64 included.
impl Serialize for MoveValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            MoveValue::Address(address) => serializer.serialize_str(address.as_str()),
            MoveValue::U64(value) => serializer.collect_str(value),
            MoveValue::String(value) => serializer.serialize_str(value),
        }
    }
}

/// A read-only view call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewRequest {
    /// The view function
    pub function: FunctionId,
    /// Type arguments
    pub type_arguments: Vec<String>,
    /// Positional arguments
    pub arguments: Vec<MoveValue>,
}

/// Compiled Move script bytecode, hex encoded with a `0x` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScriptCode {
    /// The bytecode
    pub bytecode: String,
}

/// The payload handed to the wallet for signing and submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TransactionPayload {
    /// Call a published entry function.
    #[serde(rename = "entry_function_payload")]
    EntryFunction {
        /// The entry function
        function: FunctionId,
        /// Type arguments
        type_arguments: Vec<String>,
        /// Positional arguments
        arguments: Vec<MoveValue>,
    },
    /// Run a script.
    #[serde(rename = "script_payload")]
    Script {
        /// The script bytecode
        code: ScriptCode,
        /// Type arguments
        type_arguments: Vec<String>,
        /// Positional arguments
        arguments: Vec<MoveValue>,
    },
}

impl TransactionPayload {
    /// Returns the positional arguments of the payload.
    pub fn arguments(&self) -> &[MoveValue] {
        match self {
            TransactionPayload::EntryFunction { arguments, .. } => arguments,
            TransactionPayload::Script { arguments, .. } => arguments,
        }
    }
}

/// A transaction accepted by the wallet but not yet confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// The transaction hash
    pub hash: TxHash,
}

/// A transaction that has been committed on chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTransaction {
    /// The transaction hash
    pub hash: TxHash,
    /// The ledger version the transaction was committed at
    pub version: u64,
    /// Whether the transaction executed successfully
    pub success: bool,
    /// The VM status message
    pub vm_status: String,
}
