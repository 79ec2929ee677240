use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::error::{ProvisionError, ProvisionResult};
use crate::model::SiteConfig;

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";
pub const TENANT_ID_VAR: &str = "TENANT_ID";
pub const SUBSCRIPTION_ID_VAR: &str = "SUBSCRIPTION_ID";

pub const DEFAULT_REGION: &str = "eastus";

/// Service-principal credentials for the management API.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
}

impl Credentials {
    /// Read `CLIENT_ID`, `CLIENT_SECRET`, `TENANT_ID` and
    /// `SUBSCRIPTION_ID` from the environment.
    pub fn from_env() -> ProvisionResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build credentials from an arbitrary key lookup. Empty values
    /// count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ProvisionResult<Self> {
        let get = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ProvisionError::EnvMissing(key.to_string()))
        };

        Ok(Self {
            client_id: get(CLIENT_ID_VAR)?,
            client_secret: get(CLIENT_SECRET_VAR)?,
            tenant_id: get(TENANT_ID_VAR)?,
            subscription_id: get(SUBSCRIPTION_ID_VAR)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

/// Names of every resource the workflow creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub resource_group: String,
    pub domain: String,
    pub plans: [String; 3],
    pub web_apps: [String; 5],
    pub traffic_manager: String,
}

impl ResourceNames {
    /// Fresh randomised names, so repeated runs do not collide.
    #[must_use]
    pub fn random() -> Self {
        Self {
            resource_group: random_name("rgNEMV_"),
            domain: format!("{}.com", random_name("jsdkdemo-")),
            plans: [
                random_name("jplan1_"),
                random_name("jplan2_"),
                random_name("jplan3_"),
            ],
            web_apps: [
                random_name("webapp1-"),
                random_name("webapp2-"),
                random_name("webapp3-"),
                random_name("webapp4-"),
                random_name("webapp5-"),
            ],
            traffic_manager: random_name("jsdktm-"),
        }
    }
}

/// Everything a run needs, passed explicitly to each step.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub region: String,
    pub names: ResourceNames,
    pub pfx_path: PathBuf,
    pub certificate_password: String,
    pub site_config: SiteConfig,
    pub cleanup_domain: bool,
    pub keep_certificate: bool,
}

impl WorkflowConfig {
    /// Random names, a fresh certificate password and the PFX in
    /// the working directory.
    #[must_use]
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_string(),
            names: ResourceNames::random(),
            pfx_path: PathBuf::from(pfx_file_name()),
            certificate_password: generate_password(),
            site_config: SiteConfig::default(),
            cleanup_domain: true,
            keep_certificate: false,
        }
    }

    #[must_use]
    pub fn names(mut self, names: ResourceNames) -> Self {
        self.names = names;
        self
    }

    #[must_use]
    pub fn certificate_dir(mut self, dir: &Path) -> Self {
        self.pfx_path = dir.join(pfx_file_name());
        self
    }

    #[must_use]
    pub fn certificate_password(mut self, password: &str) -> Self {
        self.certificate_password = password.to_string();
        self
    }

    #[must_use]
    pub fn site_config(mut self, site_config: SiteConfig) -> Self {
        self.site_config = site_config;
        self
    }

    #[must_use]
    pub const fn cleanup_domain(mut self, enabled: bool) -> Self {
        self.cleanup_domain = enabled;
        self
    }

    #[must_use]
    pub const fn keep_certificate(mut self, keep: bool) -> Self {
        self.keep_certificate = keep;
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

/// PFX file name derived from the package name.
#[must_use]
pub fn pfx_file_name() -> String {
    format!("webapp_{}.pfx", env!("CARGO_PKG_NAME").replace('-', "_"))
}

/// `prefix` followed by eight random lowercase alphanumerics.
#[must_use]
pub fn random_name(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{prefix}{suffix}")
}

/// Random 20-character alphanumeric password.
#[must_use]
pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}
