//! TP-Link router client
//!
//! Drives the router's web administration pages the same way its own UI
//! does: Basic-Auth GET requests against the `/userRpm/*.htm` endpoints,
//! with state scraped back out of the returned HTML.

use crate::error::{Result, RouterError};
use crate::http::{HttpClient, Transport};
use crate::models::WanConfig;
use crate::parser;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, HOST, REFERER};
use std::time::Duration;
use urlencoding::encode;

const MAC_CLONE_PATH: &str = "/userRpm/MacCloneCfgRpm.htm";
const PPPOE_PATH: &str = "/userRpm/PPPoECfgRpm.htm";
const WAN_PATH: &str = "/userRpm/WanCfgRpm.htm";

/// Seconds to pause between disconnect and connect.
pub const DEFAULT_WAIT_SECS: u64 = 10;

/// Marker the router's web server returns when it rejects the credentials.
const UNAUTHORIZED_STATUS: &str = "HTTP/1.1 401";

/// One router's control surface.
///
/// Setters return `&mut Self` and network operations return
/// `Result<&mut Self>`, so calls chain:
///
/// ```no_run
/// # async fn run() -> tplink_router::Result<()> {
/// let mut router = tplink_router::Router::new(Some("192.168.0.1"), Some("admin"), Some("admin"))?;
/// router
///     .disconnect(None, None)
///     .await?
///     .wait(Some(5))
///     .await
///     .connect(None, None)
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// Not meant to be shared between tasks; use one instance per router.
pub struct Router {
    host: Option<String>,
    /// `Basic base64(user:pass)` for the web administration login.
    auth: Option<String>,
    /// PPPoE account.
    username: Option<String>,
    password: Option<String>,
    mac: Option<String>,
    transport: Box<dyn Transport>,
}

impl Router {
    /// Create a router client on top of a default [`HttpClient`].
    ///
    /// The auth token is only derived when both admin credentials are given.
    pub fn new(
        host: Option<&str>,
        router_username: Option<&str>,
        router_password: Option<&str>,
    ) -> Result<Self> {
        let transport = HttpClient::new(None)?;
        Ok(Self::with_transport(
            Box::new(transport),
            host,
            router_username,
            router_password,
        ))
    }

    pub fn with_transport(
        transport: Box<dyn Transport>,
        host: Option<&str>,
        router_username: Option<&str>,
        router_password: Option<&str>,
    ) -> Self {
        let mut router = Self {
            host: host.map(str::to_string),
            auth: None,
            username: None,
            password: None,
            mac: None,
            transport,
        };

        if let (Some(username), Some(password)) = (router_username, router_password) {
            router.set_auth(username, password);
        }

        router
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn mac_address(&self) -> Option<&str> {
        self.mac.as_deref()
    }

    pub fn set_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.host = Some(host.into());
        self
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> &mut Self {
        self.username = Some(username.into());
        self
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> &mut Self {
        self.password = Some(password.into());
        self
    }

    pub fn set_mac_address(&mut self, mac: impl Into<String>) -> &mut Self {
        self.mac = Some(mac.into());
        self
    }

    /// Derive the Basic-Auth token for the web administration login.
    pub fn set_auth(&mut self, username: &str, password: &str) -> &mut Self {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        self.auth = Some(format!("Basic {}", encoded));
        self
    }

    /// Adopt a PPPoE account.
    ///
    /// With neither value given, the account currently configured on the
    /// router is scraped and adopted. With only one given, the missing half
    /// comes from the client, or from the router if the client has none.
    pub async fn set_username_and_password(
        &mut self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<&mut Self> {
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) => (u.to_string(), p.to_string()),
            (None, None) => {
                let current = self.get_config_assoc().await?.credentials();
                (current.username, current.password)
            }
            (u, p) => {
                let known_username = u.map(str::to_string).or_else(|| self.username.clone());
                let known_password = p.map(str::to_string).or_else(|| self.password.clone());
                match (known_username, known_password) {
                    (Some(u), Some(p)) => (u, p),
                    (u, p) => {
                        let current = self.get_config_assoc().await?.credentials();
                        (
                            u.unwrap_or(current.username),
                            p.unwrap_or(current.password),
                        )
                    }
                }
            }
        };

        self.username = Some(username);
        self.password = Some(password);
        Ok(self)
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.host.is_none() {
            return Err(RouterError::UndefinedHost);
        }
        if self.auth.is_none() {
            return Err(RouterError::UndefinedAuth);
        }
        Ok(())
    }

    fn page_url(&self, page: &str) -> Result<String> {
        let host = self.host.as_deref().ok_or(RouterError::UndefinedHost)?;
        Ok(format!("http://{}{}", host, page))
    }

    /// GET `http://{host}{path}` with the router's expected headers and
    /// return the raw `status + headers + body` blob.
    pub async fn send_request(&self, path: &str, referer: &str) -> Result<String> {
        let host = self.host.as_deref().ok_or(RouterError::UndefinedHost)?;
        let auth = self.auth.as_deref().ok_or(RouterError::UndefinedAuth)?;

        let mut authorization = HeaderValue::from_str(auth)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_str(host)?);
        headers.insert(REFERER, HeaderValue::from_str(referer)?);
        headers.insert(AUTHORIZATION, authorization);

        // Query strings carry the PPPoE password.
        let page = path.split('?').next().unwrap_or(path);
        tracing::debug!("GET http://{}{}", host, page);

        let response = self
            .transport
            .get(&format!("http://{}{}", host, path), headers)
            .await?;
        check_for_error(&response)?;

        Ok(response)
    }

    /// Clone a MAC address onto the WAN port.
    ///
    /// Falls back to the stored MAC; fails with [`RouterError::UndefinedMac`]
    /// if there is none.
    pub async fn change_mac_address(&mut self, mac: Option<&str>) -> Result<&mut Self> {
        self.ensure_ready()?;
        let mac = mac
            .map(str::to_string)
            .or_else(|| self.mac.clone())
            .ok_or(RouterError::UndefinedMac)?;

        tracing::info!("Cloning MAC address {}", mac);
        let path = format!("{}?mac1={}&wan=1&Save=Save", MAC_CLONE_PATH, encode(&mac));
        let referer = self.page_url(MAC_CLONE_PATH)?;
        self.send_request(&path, &referer).await?;

        self.mac = Some(mac);
        Ok(self)
    }

    /// Bring the PPPoE link up, optionally with a different account.
    pub async fn connect(
        &mut self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<&mut Self> {
        self.ensure_ready()?;
        self.set_username_and_password(username, password).await?;

        let username = self.username.clone().unwrap_or_default();
        let password = self.password.clone().unwrap_or_default();
        tracing::info!("Connecting PPPoE as '{}'", username);

        let path = pppoe_path(&username, &password, &password, "Connect");
        let referer = self.page_url(PPPOE_PATH)?;
        self.send_request(&path, &referer).await?;
        Ok(self)
    }

    /// Bring the PPPoE link down.
    ///
    /// `confirm` is filled from the `password` argument as given, not from
    /// the resolved account; the router accepts an empty confirmation here.
    pub async fn disconnect(
        &mut self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<&mut Self> {
        self.ensure_ready()?;
        self.set_username_and_password(username, password).await?;

        let resolved_username = self.username.clone().unwrap_or_default();
        let resolved_password = self.password.clone().unwrap_or_default();
        tracing::info!("Disconnecting PPPoE account '{}'", resolved_username);

        let path = pppoe_path(
            &resolved_username,
            &resolved_password,
            password.unwrap_or_default(),
            "Disconnect",
        );
        let referer = self.page_url(PPPOE_PATH)?;
        self.send_request(&path, &referer).await?;
        Ok(self)
    }

    /// Disconnect, pause `interval` seconds, then connect with the given
    /// account. A failed connect leaves the link down.
    pub async fn reconnect(
        &mut self,
        interval: Option<u64>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<&mut Self> {
        self.disconnect(None, None)
            .await?
            .wait(interval)
            .await
            .connect(username, password)
            .await?;
        Ok(self)
    }

    /// Switch PPPoE accounts. The firmware has no in-place update, so this
    /// is a full reconnect with the new account.
    pub async fn change_user_and_reconnect(
        &mut self,
        username: Option<&str>,
        password: Option<&str>,
        interval: Option<u64>,
    ) -> Result<&mut Self> {
        self.reconnect(interval, username, password).await
    }

    pub async fn wait(&mut self, interval: Option<u64>) -> &mut Self {
        let secs = interval.unwrap_or(DEFAULT_WAIT_SECS);
        tracing::debug!("Waiting {}s", secs);
        tokio::time::sleep(Duration::from_secs(secs)).await;
        self
    }

    /// Scrape the raw `pppoeInf` field list.
    pub async fn get_config(&self) -> Result<Vec<String>> {
        let referer = self.page_url(WAN_PATH)?;
        let response = self.send_request(PPPOE_PATH, &referer).await?;
        parser::parse_wan_config(&response)
    }

    pub async fn get_config_assoc(&self) -> Result<WanConfig> {
        WanConfig::from_fields(self.get_config().await?)
    }
}

fn pppoe_path(username: &str, password: &str, confirm: &str, action: &str) -> String {
    format!(
        "{}?wan=0&wantype=2&acc={}&psw={}&confirm={}&SecType=0&sta_ip=0.0.0.0&sta_mask=0.0.0.0&linktype=2&{}={}",
        PPPOE_PATH,
        encode(username),
        encode(password),
        encode(confirm),
        action,
        action
    )
}

fn check_for_error(response: &str) -> Result<()> {
    if response.contains(UNAUTHORIZED_STATUS) {
        return Err(RouterError::InvalidAuth);
    }
    Ok(())
}
