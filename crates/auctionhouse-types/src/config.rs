//! Configuration for an AuctionHouse instance.

use serde::{Deserialize, Serialize};

use crate::{Address, AuctionError, Result, constants};

/// Which asset contracts an instance accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CollectionMode {
    /// Any contract passing the asset-interface check; callers name the
    /// contract per auction.
    #[default]
    Multi,
    /// Bound to one collection at initialization; callers pass only the
    /// asset id.
    Single { asset_contract: Address },
}

/// Configuration for a single AuctionHouse instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionHouseConfig {
    /// Address that holds escrowed assets and funds.
    pub house_address: Address,
    /// The wrapped-native token contract used to escrow native bids.
    pub wrapped_native: Address,
    #[serde(default)]
    pub collection_mode: CollectionMode,
    /// Anti-snipe window in seconds.
    #[serde(default = "default_time_buffer_secs")]
    pub time_buffer_secs: u64,
    /// Minimum relative raise over the standing bid, in percent.
    #[serde(default = "default_min_bid_increment_percentage")]
    pub min_bid_increment_percentage: u8,
    /// May cancel any unbid auction, pause the house, and tune parameters.
    #[serde(default)]
    pub admins: Vec<Address>,
    /// When set, only these addresses may create auctions.
    #[serde(default)]
    pub auction_creators: Option<Vec<Address>>,
    #[serde(default)]
    pub paused: bool,
}

fn default_time_buffer_secs() -> u64 {
    constants::DEFAULT_TIME_BUFFER_SECS
}

fn default_min_bid_increment_percentage() -> u8 {
    constants::DEFAULT_MIN_BID_INCREMENT_PERCENTAGE
}

impl AuctionHouseConfig {
    /// A multi-collection, unpaused configuration with default parameters
    /// and no admins.
    #[must_use]
    pub fn new(house_address: Address, wrapped_native: Address) -> Self {
        Self {
            house_address,
            wrapped_native,
            collection_mode: CollectionMode::Multi,
            time_buffer_secs: constants::DEFAULT_TIME_BUFFER_SECS,
            min_bid_increment_percentage: constants::DEFAULT_MIN_BID_INCREMENT_PERCENTAGE,
            admins: Vec::new(),
            auction_creators: None,
            paused: false,
        }
    }

    /// Bind the instance to one asset contract.
    #[must_use]
    pub fn single_collection(mut self, asset_contract: Address) -> Self {
        self.collection_mode = CollectionMode::Single { asset_contract };
        self
    }

    #[must_use]
    pub fn with_admin(mut self, admin: Address) -> Self {
        self.admins.push(admin);
        self
    }

    #[must_use]
    pub fn with_min_bid_increment_percentage(mut self, pct: u8) -> Self {
        self.min_bid_increment_percentage = pct;
        self
    }

    #[must_use]
    pub fn with_time_buffer_secs(mut self, secs: u64) -> Self {
        self.time_buffer_secs = secs;
        self
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// `Configuration` on malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// `Configuration` if an address is zero, the house and wrapped token
    /// coincide, or the increment exceeds 100%.
    pub fn validate(&self) -> Result<()> {
        if self.house_address.is_zero() {
            return Err(AuctionError::Configuration(
                "house_address must not be zero".into(),
            ));
        }
        if self.wrapped_native.is_zero() {
            return Err(AuctionError::Configuration(
                "wrapped_native must not be zero".into(),
            ));
        }
        if self.house_address == self.wrapped_native {
            return Err(AuctionError::Configuration(
                "house_address and wrapped_native must differ".into(),
            ));
        }
        if self.min_bid_increment_percentage > constants::PERCENTAGE_SCALE {
            return Err(AuctionError::Configuration(format!(
                "min_bid_increment_percentage {} exceeds {}",
                self.min_bid_increment_percentage,
                constants::PERCENTAGE_SCALE
            )));
        }
        if let CollectionMode::Single { asset_contract } = self.collection_mode {
            if asset_contract.is_zero() {
                return Err(AuctionError::Configuration(
                    "single-collection asset_contract must not be zero".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuctionHouseConfig {
        AuctionHouseConfig::new(Address::from_label("house"), Address::from_label("weth"))
    }

    #[test]
    fn defaults() {
        let cfg = config();
        assert_eq!(cfg.time_buffer_secs, 900);
        assert_eq!(cfg.min_bid_increment_percentage, 5);
        assert_eq!(cfg.collection_mode, CollectionMode::Multi);
        assert!(!cfg.paused);
        assert!(cfg.admins.is_empty());
        assert!(cfg.auction_creators.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn from_json_fills_defaults() {
        let json = format!(
            r#"{{
                "house_address": "{}",
                "wrapped_native": "{}",
                "collection_mode": {{ "mode": "single", "asset_contract": "{}" }},
                "min_bid_increment_percentage": 10
            }}"#,
            Address::from_label("house"),
            Address::from_label("weth"),
            Address::from_label("media"),
        );
        let cfg = AuctionHouseConfig::from_json(&json).unwrap();
        assert_eq!(cfg.min_bid_increment_percentage, 10);
        assert_eq!(cfg.time_buffer_secs, 900);
        assert_eq!(
            cfg.collection_mode,
            CollectionMode::Single {
                asset_contract: Address::from_label("media")
            }
        );
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = AuctionHouseConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AuctionError::Configuration(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = config();
        cfg.house_address = Address::ZERO;
        assert!(cfg.validate().is_err());

        let cfg = config().with_min_bid_increment_percentage(101);
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.wrapped_native = cfg.house_address;
        assert!(cfg.validate().is_err());

        let cfg = config().single_collection(Address::ZERO);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = config()
            .with_admin(Address::from_label("admin"))
            .single_collection(Address::from_label("media"));
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AuctionHouseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
