//! Deployments: the asset table, routing table and view layout of one faucet.
//!
//! The built-in presets mirror the faucets that are live on testnet. Any other
//! deployment can be described in a JSON file with the same shape.

use crate::errors::CoreError;
use crate::routing::{ArgSlot, CallTarget, Route, RoutingTable};
use crate::types::{
    AccountAddress, AssetDescriptor, AssetSymbol, FunctionId, MoveValue, TrackedAsset,
    ViewRequest,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// View function returning the coin balance of an account.
pub const COIN_BALANCE_VIEW: &str = "0x1::coin::balance";

/// View function returning the fungible asset balance of an account.
pub const FA_BALANCE_VIEW: &str = "0x1::primary_fungible_store::balance";

/// Type argument used by the owner-first fungible asset view.
pub const OBJECT_CORE_TYPE: &str = "0x1::object::ObjectCore";

/// Names of the built-in deployments.
pub const PRESETS: &[&str] = &["asset-faucet", "test-app", "wallet-tester"];

/// Argument layout of the fungible asset balance view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaViewLayout {
    /// `balance<ObjectCore>(owner, metadata)`
    OwnerFirst,
    /// `balance(metadata, owner)`
    MetadataFirst,
}

impl Default for FaViewLayout {
    fn default() -> Self {
        FaViewLayout::OwnerFirst
    }
}

/// Builds the view call that reads `source` for `account`.
pub fn balance_view_request(
    source: &AssetDescriptor,
    layout: FaViewLayout,
    account: &AccountAddress,
) -> Result<ViewRequest, CoreError> {
    let request = match source {
        AssetDescriptor::Coin { coin_type } => ViewRequest {
            function: COIN_BALANCE_VIEW.parse()?,
            type_arguments: vec![coin_type.clone()],
            arguments: vec![MoveValue::Address(account.clone())],
        },
        AssetDescriptor::FungibleAsset { metadata } => {
            let function: FunctionId = FA_BALANCE_VIEW.parse()?;
            match layout {
                FaViewLayout::OwnerFirst => ViewRequest {
                    function,
                    type_arguments: vec![OBJECT_CORE_TYPE.to_string()],
                    arguments: vec![
                        MoveValue::Address(account.clone()),
                        MoveValue::Address(metadata.clone()),
                    ],
                },
                FaViewLayout::MetadataFirst => ViewRequest {
                    function,
                    type_arguments: vec![],
                    arguments: vec![
                        MoveValue::Address(metadata.clone()),
                        MoveValue::Address(account.clone()),
                    ],
                },
            }
        }
    };
    Ok(request)
}

/// A complete faucet deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Human readable name
    pub name: String,
    /// Layout of the fungible asset balance view
    #[serde(default)]
    pub fa_view: FaViewLayout,
    /// Assets shown to the user, in display order
    pub assets: Vec<TrackedAsset>,
    /// Assets that can be minted here
    pub routes: Vec<Route>,
}

impl Deployment {
    /// Returns a built-in deployment by name.
    pub fn preset(name: &str) -> Result<Self, CoreError> {
        let deployment = match name {
            "asset-faucet" => asset_faucet(),
            "test-app" => test_app(),
            "wallet-tester" => wallet_tester(),
            other => {
                return Err(CoreError::DeploymentError(format!(
                    "unknown preset {} (available: {})",
                    other,
                    PRESETS.join(", ")
                )))
            }
        }?;
        deployment.validate()?;
        Ok(deployment)
    }

    /// Loads a deployment from a JSON file and validates it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            CoreError::DeploymentError(format!("failed to open {}: {}", path.display(), e))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            CoreError::DeploymentError(format!("failed to read {}: {}", path.display(), e))
        })?;

        let deployment: Deployment = serde_json::from_str(&contents).map_err(|e| {
            CoreError::DeploymentError(format!("failed to parse {}: {}", path.display(), e))
        })?;
        deployment.validate()?;
        debug!(
            "Loaded deployment {} with {} assets from {}",
            deployment.name,
            deployment.assets.len(),
            path.display()
        );
        Ok(deployment)
    }

    /// Saves the deployment to a JSON file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CoreError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::DeploymentError(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| CoreError::DeploymentError(e.to_string()))?;
        Ok(())
    }

    /// Checks asset symbols are unique and every route targets a tracked asset.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = BTreeSet::new();
        for asset in &self.assets {
            if !seen.insert(asset.symbol.clone()) {
                return Err(CoreError::DuplicateSymbol(asset.symbol.to_string()));
            }
        }

        for route in &self.routes {
            if !seen.contains(&route.symbol) {
                return Err(CoreError::InvalidRoute {
                    symbol: route.symbol.to_string(),
                    reason: "route targets an asset that is not tracked".to_string(),
                });
            }
        }

        self.routing_table().map(|_| ())
    }

    /// Builds the routing table, including external faucet links for
    /// assets that have no route.
    pub fn routing_table(&self) -> Result<RoutingTable, CoreError> {
        let routed: BTreeSet<&AssetSymbol> = self.routes.iter().map(|r| &r.symbol).collect();
        let links: Vec<(AssetSymbol, String)> = self
            .assets
            .iter()
            .filter(|a| !routed.contains(&a.symbol))
            .filter_map(|a| a.external_faucet.clone().map(|url| (a.symbol.clone(), url)))
            .collect();

        RoutingTable::new(self.routes.clone())?.with_external_faucets(links)
    }

    /// Looks up a tracked asset by symbol.
    pub fn asset(&self, symbol: &str) -> Option<&TrackedAsset> {
        self.assets.iter().find(|a| a.symbol.as_str() == symbol)
    }
}

fn coin(symbol: &str, coin_type: &str, decimals: u32, external: Option<&str>) -> TrackedAsset {
    TrackedAsset {
        symbol: AssetSymbol::from(symbol),
        source: AssetDescriptor::Coin {
            coin_type: coin_type.to_string(),
        },
        decimals,
        external_faucet: external.map(str::to_string),
    }
}

fn fungible(
    symbol: &str,
    metadata: &str,
    decimals: u32,
    external: Option<&str>,
) -> Result<TrackedAsset, CoreError> {
    Ok(TrackedAsset {
        symbol: AssetSymbol::from(symbol),
        source: AssetDescriptor::FungibleAsset {
            metadata: metadata.parse()?,
        },
        decimals,
        external_faucet: external.map(str::to_string),
    })
}

fn entry(
    symbol: &str,
    function: &str,
    arguments: Vec<ArgSlot>,
    scale: u32,
    max: i64,
) -> Result<Route, CoreError> {
    Ok(Route {
        symbol: AssetSymbol::from(symbol),
        target: CallTarget::EntryFunction {
            function: function.parse()?,
        },
        type_arguments: vec![],
        arguments,
        scale,
        max_amount: Some(Decimal::new(max, 0)),
    })
}

const APT_COIN: &str = "0x1::aptos_coin::AptosCoin";
const APT_FAUCET: &str = "https://aptos.dev/en/network/faucet";
const USDC_FAUCET: &str = "https://faucet.circle.com/";

const USDT_FAUCET_FN: &str =
    "0x24246c14448a5994d9f23e3b978da2a354e64b6dfe54220debb8850586c448cc::usdt::faucet_to_address";
const TOKEN_FACTORY_MINT_FN: &str =
    "0xc7a799e2b03f3ffa3ed4239ab9ecec797cc97d51fbee2cb7bf93eb201f356b36::token_factory::mint";
const TEST_FAUCET_MODULE: &str =
    "0xc41a43fe91e24dfb73a94d6a5cc9d388037819db72c651437c9615a64aa4dcb2::faucet";

/// Compiled script calling `0x1::aptos_account::transfer(signer, address, u64)`.
const TRANSFER_SCRIPT: &str = "0xa11ceb0b0700000a05010002030206050806070e17082520000000010001000103060c0503000d6170746f735f6163636f756e74087472616e736665720000000000000000000000000000000000000000000000000000000000000001000001050b000b010b02110002";

/// Stable-value asset faucet: USDt, USDe and sUSDe mintable, USDC and APT external.
fn asset_faucet() -> Result<Deployment, CoreError> {
    Ok(Deployment {
        name: "asset-faucet".to_string(),
        fa_view: FaViewLayout::OwnerFirst,
        assets: vec![
            fungible(
                "USDt",
                "0xd5d0d561493ea2b9410f67da804653ae44e793c2423707d4f11edb2e38192050",
                6,
                None,
            )?,
            fungible(
                "USDC",
                "0x69091fbab5f7d635ee7ac5098cf0c1efbe31d68fec0f2cd565e8d168daf52832",
                6,
                Some(USDC_FAUCET),
            )?,
            fungible(
                "USDe",
                "0xce0d439eac6f53be3f295c7f370e2a0c168f07fb17c4cc7773b7e1571f5b8490",
                6,
                None,
            )?,
            fungible(
                "sUSDe",
                "0x8e67e42c4ff61e16dca908b737d1260b312143c1f7ba1577309f075a27cb4d90",
                6,
                None,
            )?,
            coin("APT", APT_COIN, 8, Some(APT_FAUCET)),
        ],
        routes: vec![
            entry(
                "USDt",
                USDT_FAUCET_FN,
                vec![ArgSlot::Recipient, ArgSlot::Amount],
                6,
                10,
            )?,
            entry(
                "USDe",
                TOKEN_FACTORY_MINT_FN,
                vec![ArgSlot::Asset, ArgSlot::Amount, ArgSlot::Recipient],
                6,
                10,
            )?,
            entry(
                "sUSDe",
                TOKEN_FACTORY_MINT_FN,
                vec![ArgSlot::Asset, ArgSlot::Amount, ArgSlot::Recipient],
                6,
                10,
            )?,
        ],
    })
}

/// Test coin and test fungible asset minted by the same faucet module.
fn test_app() -> Result<Deployment, CoreError> {
    Ok(Deployment {
        name: "test-app".to_string(),
        fa_view: FaViewLayout::MetadataFirst,
        assets: vec![
            coin(
                "TFC",
                &format!("{}::TestFaucetCoin", TEST_FAUCET_MODULE),
                8,
                None,
            ),
            fungible(
                "TFA",
                "0x5a1d9d10b81424cf06223dfbdfe6d26d6ba28fd02d6721ffb28b96c3e0cb8feb",
                8,
                None,
            )?,
        ],
        routes: vec![
            entry(
                "TFC",
                &format!("{}::mint_coin_to", TEST_FAUCET_MODULE),
                vec![ArgSlot::Recipient, ArgSlot::Amount],
                6,
                100,
            )?,
            entry(
                "TFA",
                &format!("{}::mint_fa_to", TEST_FAUCET_MODULE),
                vec![ArgSlot::Recipient, ArgSlot::Amount],
                6,
                100,
            )?,
        ],
    })
}

/// APT transfer through a compiled script instead of an entry function.
fn wallet_tester() -> Result<Deployment, CoreError> {
    Ok(Deployment {
        name: "wallet-tester".to_string(),
        fa_view: FaViewLayout::OwnerFirst,
        assets: vec![coin("APT", APT_COIN, 8, None)],
        routes: vec![Route {
            symbol: AssetSymbol::from("APT"),
            target: CallTarget::Script {
                bytecode: TRANSFER_SCRIPT.to_string(),
            },
            type_arguments: vec![],
            arguments: vec![ArgSlot::Recipient, ArgSlot::Amount],
            scale: 6,
            max_amount: Some(Decimal::new(100, 0)),
        }],
    })
}
