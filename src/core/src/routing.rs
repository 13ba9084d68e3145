//! Static routing table mapping an asset symbol to its on-chain faucet call.
//!
//! Each deployment ships its own table. Routes carry their own argument order
//! and unit scale, since real faucet contracts disagree on both: one takes
//! `(recipient, amount)` at 10^6, another `(asset, amount, recipient)`, and the
//! native asset uses 10^8.

use crate::amount::{scale_amount, MAX_SCALE};
use crate::errors::CoreError;
use crate::types::{
    AssetSymbol, FaucetRequest, FunctionId, MoveValue, ScriptCode, TransactionPayload,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One positional argument of a faucet call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgSlot {
    /// The recipient address
    Recipient,
    /// The scaled amount as a u64
    Amount,
    /// The asset symbol as a string
    Asset,
}

/// What gets executed for a route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallTarget {
    /// A published entry function
    EntryFunction {
        /// The function to call
        function: FunctionId,
    },
    /// A compiled script, hex encoded with `0x` prefix
    Script {
        /// The script bytecode
        bytecode: String,
    },
}

/// How to mint or transfer one asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// The asset this route serves
    pub symbol: AssetSymbol,
    /// The call to make
    pub target: CallTarget,
    /// Type arguments passed unchanged
    #[serde(default)]
    pub type_arguments: Vec<String>,
    /// Positional arguments in the order the target declares them
    pub arguments: Vec<ArgSlot>,
    /// Power of ten applied to human amounts
    pub scale: u32,
    /// Largest amount accepted per request, in human units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
}

impl Route {
    /// Checks the route in isolation.
    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |reason: String| CoreError::InvalidRoute {
            symbol: self.symbol.to_string(),
            reason,
        };

        if self.scale > MAX_SCALE {
            return Err(invalid(format!("scale {} exceeds {}", self.scale, MAX_SCALE)));
        }

        let count = |slot: ArgSlot| self.arguments.iter().filter(|s| **s == slot).count();
        if count(ArgSlot::Recipient) != 1 {
            return Err(invalid("arguments must contain exactly one recipient".to_string()));
        }
        if count(ArgSlot::Amount) != 1 {
            return Err(invalid("arguments must contain exactly one amount".to_string()));
        }
        if count(ArgSlot::Asset) > 1 {
            return Err(invalid("arguments may contain the asset at most once".to_string()));
        }

        if let Some(max) = self.max_amount {
            if max <= Decimal::ZERO {
                return Err(invalid(format!("max amount {} must be positive", max)));
            }
        }

        if let CallTarget::Script { bytecode } = &self.target {
            let digits = bytecode
                .strip_prefix("0x")
                .ok_or_else(|| invalid("script bytecode must start with 0x".to_string()))?;
            if digits.is_empty() {
                return Err(invalid("script bytecode is empty".to_string()));
            }
            hex::decode(digits).map_err(|e| invalid(format!("script bytecode: {}", e)))?;
        }

        Ok(())
    }

    /// Scales the requested amount and lays out the call for the wallet.
    pub fn build_payload(&self, request: &FaucetRequest) -> Result<TransactionPayload, CoreError> {
        if let Some(max) = self.max_amount {
            if request.amount > max {
                return Err(CoreError::AmountAboveMax {
                    amount: request.amount.to_string(),
                    max: max.to_string(),
                });
            }
        }

        let scaled = scale_amount(request.amount, self.scale)?;
        let amount = u64::try_from(scaled)
            .map_err(|_| CoreError::AmountOverflow(request.amount.to_string()))?;

        let arguments = self
            .arguments
            .iter()
            .map(|slot| match slot {
                ArgSlot::Recipient => MoveValue::Address(request.recipient.clone()),
                ArgSlot::Amount => MoveValue::U64(amount),
                ArgSlot::Asset => MoveValue::String(self.symbol.to_string()),
            })
            .collect();

        let payload = match &self.target {
            CallTarget::EntryFunction { function } => TransactionPayload::EntryFunction {
                function: function.clone(),
                type_arguments: self.type_arguments.clone(),
                arguments,
            },
            CallTarget::Script { bytecode } => TransactionPayload::Script {
                code: ScriptCode {
                    bytecode: bytecode.clone(),
                },
                type_arguments: self.type_arguments.clone(),
                arguments,
            },
        };

        Ok(payload)
    }
}

/// Returned when an asset has no route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteNotFound {
    /// The asset that was asked for
    pub symbol: AssetSymbol,
    /// Where the asset can be obtained instead, if known
    pub external_faucet: Option<String>,
}

/// A validated, immutable set of routes keyed by asset symbol.
#[derive(Clone, Debug, Default)]
pub struct RoutingTable {
    routes: BTreeMap<AssetSymbol, Route>,
    external: BTreeMap<AssetSymbol, String>,
}

impl RoutingTable {
    /// Builds a table, rejecting invalid routes and duplicate symbols.
    pub fn new(routes: Vec<Route>) -> Result<Self, CoreError> {
        let mut table = BTreeMap::new();
        for route in routes {
            route.validate()?;
            if table.contains_key(&route.symbol) {
                return Err(CoreError::DuplicateSymbol(route.symbol.to_string()));
            }
            table.insert(route.symbol.clone(), route);
        }

        Ok(Self {
            routes: table,
            external: BTreeMap::new(),
        })
    }

    /// Adds third-party faucet links for assets without a route.
    pub fn with_external_faucets<I>(mut self, links: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (AssetSymbol, String)>,
    {
        for (symbol, url) in links {
            if self.routes.contains_key(&symbol) || self.external.contains_key(&symbol) {
                return Err(CoreError::DuplicateSymbol(symbol.to_string()));
            }
            self.external.insert(symbol, url);
        }
        Ok(self)
    }

    /// Looks up the route for an asset.
    pub fn resolve(&self, symbol: &str) -> Result<&Route, RouteNotFound> {
        self.routes.get(symbol).ok_or_else(|| RouteNotFound {
            symbol: AssetSymbol::from(symbol),
            external_faucet: self.external.get(symbol).cloned(),
        })
    }

    /// Returns the third-party faucet link of an asset, if any.
    pub fn external_faucet(&self, symbol: &str) -> Option<&str> {
        self.external.get(symbol).map(String::as_str)
    }

    /// Iterates over routes in symbol order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
