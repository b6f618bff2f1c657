use bot::config::{CommunicatorConfig, WebhookConfig, BASE_URL};
use compact_str::CompactString;
use eyre::{ensure, eyre, WrapErr};
use serde::Deserialize;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    pub address: CompactString,
    pub webhook_path: CompactString,
    pub api_url: CompactString,
    pub request_timeout_secs: u64,
    pub public_url: Option<CompactString>,
    pub drop_pending_updates: bool,
    pub tls_cert: Option<CompactString>,
    pub tls_key: Option<CompactString>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8443".into(),
            webhook_path: "/".into(),
            api_url: BASE_URL.into(),
            request_timeout_secs: 10,
            public_url: None,
            drop_pending_updates: false,
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl GlobalConfig {
    fn validate(&self) -> eyre::Result<()> {
        self.socket_addr()?;
        ensure!(
            self.tls_cert.is_some() == self.tls_key.is_some(),
            "tls_cert and tls_key go together"
        );
        self.communicator_config().verify()?;
        self.webhook_config().verify()?;
        Ok(())
    }

    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_xml(contents.as_str())
    }

    fn from_xml(contents: &str) -> eyre::Result<Self> {
        let config = serde_xml_rs::from_str::<Self>(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `WORK_DIR/config.xml` when `WORK_DIR` is set, defaults otherwise.
    pub fn load() -> eyre::Result<Self> {
        match dotenv::var("WORK_DIR") {
            Ok(work_dir) => {
                let path = Path::new(work_dir.as_str()).join("config.xml");
                Self::from_file(&path)
                    .wrap_err_with(|| format!("failed to load config from {path:?}"))
            }
            Err(_) => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn socket_addr(&self) -> eyre::Result<SocketAddr> {
        self.address
            .parse()
            .map_err(|err| eyre!("bad listen address '{}', {err}", self.address))
    }

    pub fn tls(&self) -> Option<(PathBuf, PathBuf)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_str().into(), key.as_str().into())),
            _ => None,
        }
    }

    pub fn communicator_config(&self) -> CommunicatorConfig {
        CommunicatorConfig {
            api_url: self.api_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn webhook_config(&self) -> WebhookConfig {
        WebhookConfig {
            path: self.webhook_path.clone(),
            public_url: self.public_url.clone(),
            drop_pending_updates: self.drop_pending_updates,
            ..Default::default()
        }
    }
}
