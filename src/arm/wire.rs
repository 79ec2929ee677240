//! JSON shapes for the ARM REST API.
//!
//! Request bodies are built with `serde_json::json!`; responses
//! are read back into handles by the `parse_*` functions, which
//! only require the fields later steps use.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ProvisionError, ProvisionResult};
use crate::model::{
    AppServicePlan, AppServicePlanData, AppServicePlanPatch, Contact, Domain, DomainData,
    GLOBAL_LOCATION, HostNameBinding, HostNameBindingData, ResourceGroup, ResourceGroupData,
    TrafficManagerProfile, TrafficManagerProfileData, WebApp, WebAppData,
};

pub const AZURE_ENDPOINT_TYPE: &str = "Microsoft.Network/trafficManagerProfiles/azureEndpoints";

#[must_use]
pub fn resource_group_body(data: &ResourceGroupData) -> Value {
    json!({ "location": data.location })
}

fn contact_body(contact: &Contact) -> Value {
    json!({
        "email": contact.email,
        "nameFirst": contact.first_name,
        "nameLast": contact.last_name,
        "phone": contact.phone,
        "addressMailing": {
            "address1": contact.address.address1,
            "city": contact.address.city,
            "state": contact.address.state,
            "postalCode": contact.address.postal_code,
            "country": contact.address.country,
        },
    })
}

#[must_use]
pub fn domain_body(data: &DomainData) -> Value {
    json!({
        "location": data.location,
        "properties": {
            "contactRegistrant": contact_body(&data.registrant),
            "privacy": data.privacy,
            "autoRenew": data.auto_renew,
        },
    })
}

#[must_use]
pub fn plan_body(data: &AppServicePlanData) -> Value {
    let mut properties = json!({});
    if let Some(count) = data.target_worker_count {
        properties["targetWorkerCount"] = json!(count);
    }
    json!({ "location": data.location, "properties": properties })
}

#[must_use]
pub fn plan_patch_body(patch: &AppServicePlanPatch) -> Value {
    json!({ "properties": { "targetWorkerCount": patch.target_worker_count } })
}

#[must_use]
pub fn web_app_body(data: &WebAppData) -> Value {
    json!({
        "location": data.location,
        "properties": {
            "serverFarmId": data.plan_id,
            "siteConfig": {
                "netFrameworkVersion": data.site_config.net_framework_version,
            },
        },
    })
}

#[must_use]
pub fn host_name_binding_body(data: &HostNameBindingData) -> Value {
    let mut properties = json!({
        "customHostNameDnsRecordType": data.record_type.as_str(),
        "hostNameType": data.host_name_type.as_str(),
        "azureResourceType": "Website",
        "sslState": data.ssl_state.as_str(),
    });
    if let Some(domain_id) = &data.domain_id {
        properties["domainId"] = json!(domain_id);
    }
    json!({ "properties": properties })
}

#[must_use]
pub fn traffic_manager_body(data: &TrafficManagerProfileData) -> Value {
    let endpoints: Vec<Value> = data
        .endpoints
        .iter()
        .map(|e| {
            json!({
                "name": e.name,
                "type": AZURE_ENDPOINT_TYPE,
                "properties": {
                    "targetResourceId": e.target_resource_id,
                    "endpointStatus": "Enabled",
                    "weight": 1,
                },
            })
        })
        .collect();

    json!({
        "location": GLOBAL_LOCATION,
        "properties": {
            "trafficRoutingMethod": data.routing_method.as_str(),
            "dnsConfig": { "relativeName": data.relative_dns_name, "ttl": 60 },
            "monitorConfig": { "protocol": "HTTP", "port": 80, "path": "/" },
            "endpoints": endpoints,
        },
    })
}

#[derive(Debug, Deserialize)]
struct Envelope<P> {
    id: Option<String>,
    name: Option<String>,
    location: Option<String>,
    properties: Option<P>,
}

/// Resource envelope with the mandatory fields checked.
struct Parsed<P> {
    id: String,
    name: String,
    location: Option<String>,
    properties: Option<P>,
}

fn envelope<P: serde::de::DeserializeOwned>(value: Value) -> ProvisionResult<Parsed<P>> {
    let env: Envelope<P> = serde_json::from_value(value)?;
    Ok(Parsed {
        id: env.id.ok_or_else(|| ProvisionError::MissingField("id".into()))?,
        name: env
            .name
            .ok_or_else(|| ProvisionError::MissingField("name".into()))?,
        location: env.location,
        properties: env.properties,
    })
}

#[derive(Debug, Deserialize)]
struct NoProperties {}

pub fn parse_resource_group(value: Value) -> ProvisionResult<ResourceGroup> {
    let parsed = envelope::<NoProperties>(value)?;
    Ok(ResourceGroup {
        id: parsed.id,
        name: parsed.name,
        location: parsed.location.unwrap_or_default(),
    })
}

pub fn parse_domain(value: Value) -> ProvisionResult<Domain> {
    let parsed = envelope::<NoProperties>(value)?;
    Ok(Domain {
        id: parsed.id,
        name: parsed.name,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanProperties {
    target_worker_count: Option<u32>,
}

pub fn parse_plan(value: Value) -> ProvisionResult<AppServicePlan> {
    let parsed = envelope::<PlanProperties>(value)?;
    Ok(AppServicePlan {
        id: parsed.id,
        name: parsed.name,
        target_worker_count: parsed.properties.and_then(|p| p.target_worker_count),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteProperties {
    default_host_name: Option<String>,
}

pub fn parse_web_app(value: Value) -> ProvisionResult<WebApp> {
    let parsed = envelope::<SiteProperties>(value)?;
    Ok(WebApp {
        id: parsed.id,
        name: parsed.name,
        default_host_name: parsed.properties.and_then(|p| p.default_host_name),
    })
}

pub fn parse_host_name_binding(value: Value) -> ProvisionResult<HostNameBinding> {
    let parsed = envelope::<NoProperties>(value)?;
    Ok(HostNameBinding {
        id: parsed.id,
        name: parsed.name,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileProperties {
    dns_config: Option<DnsConfig>,
}

#[derive(Debug, Deserialize)]
struct DnsConfig {
    fqdn: Option<String>,
}

pub fn parse_traffic_manager(value: Value) -> ProvisionResult<TrafficManagerProfile> {
    let parsed = envelope::<ProfileProperties>(value)?;
    Ok(TrafficManagerProfile {
        id: parsed.id,
        name: parsed.name,
        fqdn: parsed
            .properties
            .and_then(|p| p.dns_config)
            .and_then(|d| d.fqdn),
    })
}

/// Human-readable message from an ARM error body.
///
/// `{"error": {"code": "C", "message": "M"}}` becomes `C: M`;
/// anything else is returned trimmed as-is.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| error_detail(&v))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Error detail of a failed async operation resource.
#[must_use]
pub fn operation_error(body: &Value) -> String {
    error_detail(body).unwrap_or_else(|| "no error detail reported".to_string())
}

fn error_detail(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    let code = error["code"].as_str();
    let message = error["message"].as_str();

    match (code, message) {
        (Some(c), Some(m)) => Some(format!("{c}: {m}")),
        (None, Some(m)) => Some(m.to_string()),
        (Some(c), None) => Some(c.to_string()),
        (None, None) => None,
    }
}

/// `status` field of an async operation resource.
#[must_use]
pub fn operation_status(body: &Value) -> Option<&str> {
    body["status"].as_str()
}
