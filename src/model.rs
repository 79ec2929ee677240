//! Parameter bags forwarded to the resource manager and the
//! handles it hands back.
//!
//! Handles carry the remote id plus whatever later steps need;
//! they are never a full mirror of the remote state.

/// Location used by traffic-manager profiles, which are not
/// regional.
pub const GLOBAL_LOCATION: &str = "global";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupData {
    pub location: String,
}

/// Postal address of a domain contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Registrant contact attached to a domain purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: Address,
}

impl Contact {
    /// The fictitious registrant used for demo purchases.
    #[must_use]
    pub fn demo_registrant() -> Self {
        Self {
            email: "jondoe@contoso.com".to_string(),
            first_name: "Jon".to_string(),
            last_name: "Doe".to_string(),
            phone: "+1.4258828080".to_string(),
            address: Address {
                address1: "123 4th Ave".to_string(),
                city: "Redmond".to_string(),
                state: "WA".to_string(),
                postal_code: "98052".to_string(),
                country: "US".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainData {
    pub location: String,
    pub registrant: Contact,
    pub privacy: bool,
    pub auto_renew: bool,
}

impl DomainData {
    /// Privacy on, auto-renew off, demo registrant.
    #[must_use]
    pub fn demo(location: &str) -> Self {
        Self {
            location: location.to_string(),
            registrant: Contact::demo_registrant(),
            privacy: true,
            auto_renew: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppServicePlanData {
    pub location: String,
    pub target_worker_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppServicePlanPatch {
    pub target_worker_count: u32,
}

/// Runtime settings applied to every web app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub net_framework_version: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            net_framework_version: "v4.6".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAppData {
    pub location: String,
    pub plan_id: String,
    pub site_config: SiteConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsRecordType {
    CName,
    A,
}

impl DnsRecordType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CName => "CName",
            Self::A => "A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostNameType {
    Managed,
    Verified,
}

impl HostNameType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Managed => "Managed",
            Self::Verified => "Verified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslState {
    Disabled,
    SniEnabled,
    IpBasedEnabled,
}

impl SslState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::SniEnabled => "SniEnabled",
            Self::IpBasedEnabled => "IpBasedEnabled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostNameBindingData {
    pub domain_id: Option<String>,
    pub record_type: DnsRecordType,
    pub host_name_type: HostNameType,
    pub ssl_state: SslState,
}

impl HostNameBindingData {
    /// Managed CNAME binding with SNI SSL.
    #[must_use]
    pub fn managed_sni(domain_id: &str) -> Self {
        Self {
            domain_id: Some(domain_id.to_string()),
            record_type: DnsRecordType::CName,
            host_name_type: HostNameType::Managed,
            ssl_state: SslState::SniEnabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingMethod {
    Weighted,
}

impl RoutingMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weighted => "Weighted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub target_resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficManagerProfileData {
    pub routing_method: RoutingMethod,
    pub relative_dns_name: String,
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppServicePlan {
    pub id: String,
    pub name: String,
    pub target_worker_count: Option<u32>,
}

impl AppServicePlan {
    /// Patch that doubles this plan's own worker count. A plan
    /// reporting no workers counts as one.
    #[must_use]
    pub fn scale_up_patch(&self) -> AppServicePlanPatch {
        let current = self.target_worker_count.unwrap_or(1).max(1);
        AppServicePlanPatch {
            target_worker_count: current.saturating_mul(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebApp {
    pub id: String,
    pub name: String,
    pub default_host_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostNameBinding {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficManagerProfile {
    pub id: String,
    pub name: String,
    pub fqdn: Option<String>,
}
