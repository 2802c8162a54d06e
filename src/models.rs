//! Data models for the router's WAN configuration page

use crate::error::{Result, RouterError};
use serde::Serialize;
use std::str::FromStr;

/// Field offsets inside the `pppoeInf` array.
pub const USERNAME_INDEX: usize = 7;
pub const PASSWORD_INDEX: usize = 8;
pub const CONNECTION_MODE_INDEX: usize = 20;
pub const STATUS_INDEX: usize = 26;
pub const SECONDARY_CONNECTION_INDEX: usize = 29;

/// Minimum number of fields a usable snapshot carries.
pub const MIN_FIELDS: usize = SECONDARY_CONNECTION_INDEX + 1;

/// PPPoE login credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Named projection of one WAN configuration scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WanConfig {
    pub username: String,
    pub password: String,
    pub connection_mode: String,
    pub status: String,
    pub secondary_connection_type: String,
    /// Every scraped field, in page order.
    #[serde(skip)]
    pub fields: Vec<String>,
}

impl WanConfig {
    /// Project the known offsets of a scraped field list.
    pub fn from_fields(fields: Vec<String>) -> Result<Self> {
        if fields.len() < MIN_FIELDS {
            return Err(RouterError::UnknownResponse(format!(
                "expected at least {} WAN fields, got {}",
                MIN_FIELDS,
                fields.len()
            )));
        }

        Ok(Self {
            username: fields[USERNAME_INDEX].clone(),
            password: fields[PASSWORD_INDEX].clone(),
            connection_mode: fields[CONNECTION_MODE_INDEX].clone(),
            status: fields[STATUS_INDEX].clone(),
            secondary_connection_type: fields[SECONDARY_CONNECTION_INDEX].clone(),
            fields,
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    pub fn mode(&self) -> Result<ConnectionMode> {
        self.connection_mode.parse()
    }

    pub fn link_status(&self) -> Result<LinkStatus> {
        self.status.parse()
    }

    pub fn secondary(&self) -> Result<SecondaryConnection> {
        self.secondary_connection_type.parse()
    }
}

fn parse_ordinal(kind: &str, s: &str) -> Result<u8> {
    s.trim()
        .parse()
        .map_err(|_| RouterError::UnknownResponse(format!("invalid {} value '{}'", kind, s)))
}

/// PPPoE connection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionMode {
    OnDemand = 1,
    Auto = 2,
    TimeBased = 3,
    Manual = 4,
}

impl FromStr for ConnectionMode {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match parse_ordinal("connection mode", s)? {
            1 => Ok(Self::OnDemand),
            2 => Ok(Self::Auto),
            3 => Ok(Self::TimeBased),
            4 => Ok(Self::Manual),
            n => Err(RouterError::UnknownResponse(format!(
                "unknown connection mode {}",
                n
            ))),
        }
    }
}

/// WAN link status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkStatus {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
}

impl FromStr for LinkStatus {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match parse_ordinal("link status", s)? {
            0 => Ok(Self::Disconnected),
            1 => Ok(Self::Connected),
            2 => Ok(Self::Connecting),
            n => Err(RouterError::UnknownResponse(format!("unknown link status {}", n))),
        }
    }
}

/// Secondary connection type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecondaryConnection {
    Disabled = 0,
    DynamicIp = 1,
    StaticIp = 2,
}

impl FromStr for SecondaryConnection {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match parse_ordinal("secondary connection", s)? {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::DynamicIp),
            2 => Ok(Self::StaticIp),
            n => Err(RouterError::UnknownResponse(format!(
                "unknown secondary connection {}",
                n
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_fields(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    #[test]
    fn test_project_known_offsets() {
        let cfg = WanConfig::from_fields(numbered_fields(30)).unwrap();
        assert_eq!(cfg.username, "f7");
        assert_eq!(cfg.password, "f8");
        assert_eq!(cfg.connection_mode, "f20");
        assert_eq!(cfg.status, "f26");
        assert_eq!(cfg.secondary_connection_type, "f29");
        assert_eq!(cfg.fields.len(), 30);
    }

    #[test]
    fn test_credentials() {
        let creds = WanConfig::from_fields(numbered_fields(30)).unwrap().credentials();
        assert_eq!(
            creds,
            Credentials {
                username: "f7".to_string(),
                password: "f8".to_string(),
            }
        );
    }

    #[test]
    fn test_short_field_list() {
        let err = WanConfig::from_fields(numbered_fields(29)).unwrap_err();
        assert!(matches!(err, RouterError::UnknownResponse(_)));
    }

    #[test]
    fn test_typed_views() {
        let mut fields = numbered_fields(32);
        fields[CONNECTION_MODE_INDEX] = "2".to_string();
        fields[STATUS_INDEX] = " 1".to_string();
        fields[SECONDARY_CONNECTION_INDEX] = "0".to_string();

        let cfg = WanConfig::from_fields(fields).unwrap();
        assert_eq!(cfg.mode().unwrap(), ConnectionMode::Auto);
        assert_eq!(cfg.link_status().unwrap(), LinkStatus::Connected);
        assert_eq!(cfg.secondary().unwrap(), SecondaryConnection::Disabled);
    }

    #[test]
    fn test_unknown_ordinal() {
        assert!("5".parse::<ConnectionMode>().is_err());
        assert!("x".parse::<LinkStatus>().is_err());
        assert_eq!(
            "2".parse::<SecondaryConnection>().unwrap(),
            SecondaryConnection::StaticIp
        );
    }
}
