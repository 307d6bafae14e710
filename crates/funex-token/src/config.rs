//! Token configuration and deployment presets.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::access::AccessModel;
use crate::amount::Amount;
use crate::error::{ParseError, StoreError};
use crate::ledger::TokenMetadata;

/// Maximum token name length in bytes.
pub const MAX_NAME_LEN: usize = 64;

/// Maximum token symbol length in bytes.
pub const MAX_SYMBOL_LEN: usize = 16;

/// Genesis supply of the ERC20 and BEP20 presets: 50,000,000 whole tokens
/// at 18 decimals.
pub const FUNEX_GENESIS_SUPPLY: Amount = Amount::new(50_000_000 * 1_000_000_000_000_000_000);

/// Everything needed to deploy a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Display decimals.
    pub decimals: u8,
    /// Supply credited to the initializer at deployment.
    #[serde(default)]
    pub initial_supply: Amount,
    /// Access-control model gating mints.
    pub access: AccessModel,
}

impl TokenConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StoreError::Config(format!(
                "failed to read config file '{}': {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or the config fails validation.
    pub fn from_json(content: &str) -> Result<Self, StoreError> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| StoreError::Config(format!("invalid JSON: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or symbol is empty or too long.
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_label("name", &self.name, MAX_NAME_LEN)?;
        validate_label("symbol", &self.symbol, MAX_SYMBOL_LEN)?;
        Ok(())
    }

    /// Metadata the deployed ledger will carry.
    #[must_use]
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata::new(self.name.clone(), self.symbol.clone(), self.decimals)
    }
}

fn validate_label(field: &str, value: &str, max: usize) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Config(format!("{field} cannot be empty")));
    }
    if value.len() > max {
        return Err(StoreError::Config(format!(
            "{field} is {} bytes, maximum is {max}",
            value.len()
        )));
    }
    Ok(())
}

/// Built-in deployment flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Owner-minted token with a 50M genesis supply.
    Erc20,
    /// Same economics as [`Preset::Erc20`], deployed under the name `Funex`.
    Bep20,
    /// Minter-role token starting at zero supply.
    Trc20,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 3] = [Self::Erc20, Self::Bep20, Self::Trc20];

    /// Configuration this preset deploys.
    #[must_use]
    pub fn config(self) -> TokenConfig {
        match self {
            Self::Erc20 => TokenConfig {
                name: "FunexCoin".to_string(),
                symbol: "Funex".to_string(),
                decimals: 18,
                initial_supply: FUNEX_GENESIS_SUPPLY,
                access: AccessModel::SingleOwner,
            },
            Self::Bep20 => TokenConfig {
                name: "Funex".to_string(),
                symbol: "Funex".to_string(),
                decimals: 18,
                initial_supply: FUNEX_GENESIS_SUPPLY,
                access: AccessModel::SingleOwner,
            },
            Self::Trc20 => TokenConfig {
                name: "Funex".to_string(),
                symbol: "FNX".to_string(),
                decimals: 6,
                initial_supply: Amount::ZERO,
                access: AccessModel::MinterRole,
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Erc20 => write!(f, "erc20"),
            Self::Bep20 => write!(f, "bep20"),
            Self::Trc20 => write!(f, "trc20"),
        }
    }
}

impl FromStr for Preset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "erc20" => Ok(Self::Erc20),
            "bep20" => Ok(Self::Bep20),
            "trc20" => Ok(Self::Trc20),
            _ => Err(ParseError::Unknown {
                what: "preset",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("failed to write temp file");
        file
    }

    #[test]
    fn genesis_supply_is_fifty_million_whole_tokens() {
        assert_eq!(
            Some(FUNEX_GENESIS_SUPPLY),
            Amount::from_whole(50_000_000, 18)
        );
    }

    #[test_case(Preset::Erc20, AccessModel::SingleOwner, 18 ; "erc20")]
    #[test_case(Preset::Bep20, AccessModel::SingleOwner, 18 ; "bep20")]
    #[test_case(Preset::Trc20, AccessModel::MinterRole, 6 ; "trc20")]
    fn presets_are_valid(preset: Preset, access: AccessModel, decimals: u8) {
        let config = preset.config();
        config.validate().expect("preset validates");
        assert_eq!(config.access, access);
        assert_eq!(config.decimals, decimals);
    }

    #[test_case(Preset::Erc20, "FunexCoin", "Funex", 18 ; "erc20")]
    #[test_case(Preset::Bep20, "Funex", "Funex", 18 ; "bep20")]
    #[test_case(Preset::Trc20, "Funex", "FNX", 6 ; "trc20")]
    fn preset_metadata(preset: Preset, name: &str, symbol: &str, decimals: u8) {
        let metadata = preset.config().metadata();
        assert_eq!(metadata.name(), name);
        assert_eq!(metadata.symbol(), symbol);
        assert_eq!(metadata.decimals(), decimals);
    }

    #[test]
    fn trc20_starts_empty() {
        assert!(Preset::Trc20.config().initial_supply.is_zero());
        assert_eq!(Preset::Erc20.config().metadata().symbol(), "Funex");
    }

    #[test]
    fn preset_parse_is_case_insensitive() {
        assert_eq!("ERC20".parse::<Preset>(), Ok(Preset::Erc20));
        assert_eq!("trc20".parse::<Preset>(), Ok(Preset::Trc20));
        assert!("erc721".parse::<Preset>().is_err());
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>(), Ok(preset));
        }
    }

    #[test]
    fn parse_json_config() {
        let json = r#"{
            "name": "Test Token",
            "symbol": "TST",
            "decimals": 8,
            "initial_supply": "1000",
            "access": "minter-role"
        }"#;
        let config = TokenConfig::from_json(json).expect("parse");
        assert_eq!(config.initial_supply, Amount::new(1_000));
        assert_eq!(config.access, AccessModel::MinterRole);
    }

    #[test]
    fn initial_supply_defaults_to_zero() {
        let json = r#"{"name":"T","symbol":"T","decimals":0,"access":"single-owner"}"#;
        let config = TokenConfig::from_json(json).expect("parse");
        assert_eq!(config.initial_supply, Amount::ZERO);
    }

    #[test]
    fn load_from_file() {
        let json = serde_json::to_string(&Preset::Bep20.config()).expect("serialize");
        let temp_file = create_temp_config(&json);
        let config = TokenConfig::from_file(temp_file.path()).expect("should load from file");
        assert_eq!(config, Preset::Bep20.config());
    }

    #[test]
    fn file_not_found() {
        let result = TokenConfig::from_file("/nonexistent/path/token.json");
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn empty_name_rejected() {
        let json = r#"{"name":"  ","symbol":"T","decimals":0,"access":"single-owner"}"#;
        let err = TokenConfig::from_json(json).expect_err("should reject");
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn long_symbol_rejected() {
        let mut config = Preset::Erc20.config();
        config.symbol = "S".repeat(MAX_SYMBOL_LEN + 1);
        assert!(config.validate().is_err());
        config.symbol = "S".repeat(MAX_SYMBOL_LEN);
        assert!(config.validate().is_ok());
    }
}
