pub mod client;
pub mod lro;
pub mod wire;

use async_trait::async_trait;

use crate::error::ProvisionResult;
use crate::model::{
    AppServicePlan, AppServicePlanData, AppServicePlanPatch, Domain, DomainData, HostNameBinding,
    HostNameBindingData, ResourceGroup, ResourceGroupData, TrafficManagerProfile,
    TrafficManagerProfileData, WebApp, WebAppData,
};

pub const WEB_PROVIDER: &str = "Microsoft.Web";
pub const DOMAIN_PROVIDER: &str = "Microsoft.DomainRegistration";
pub const NETWORK_PROVIDER: &str = "Microsoft.Network";

/// The management-plane operations the workflow depends on.
///
/// Every method returns only once the remote long-running
/// operation has reached a terminal state, so a returned handle
/// is safe to reference from the next call.
#[async_trait]
pub trait ResourceManager: Send + Sync {
    /// Create or update a resource group.
    async fn create_resource_group(
        &self,
        name: &str,
        data: &ResourceGroupData,
    ) -> ProvisionResult<ResourceGroup>;

    /// Register a domain inside `group`.
    async fn purchase_domain(
        &self,
        group: &ResourceGroup,
        name: &str,
        data: &DomainData,
    ) -> ProvisionResult<Domain>;

    async fn create_app_service_plan(
        &self,
        group: &ResourceGroup,
        name: &str,
        data: &AppServicePlanData,
    ) -> ProvisionResult<AppServicePlan>;

    /// Apply `patch` and return the plan as the service now
    /// reports it.
    async fn update_app_service_plan(
        &self,
        plan: &AppServicePlan,
        patch: &AppServicePlanPatch,
    ) -> ProvisionResult<AppServicePlan>;

    async fn create_web_app(
        &self,
        group: &ResourceGroup,
        name: &str,
        data: &WebAppData,
    ) -> ProvisionResult<WebApp>;

    /// Bind `host_name` to `app`.
    async fn create_host_name_binding(
        &self,
        app: &WebApp,
        host_name: &str,
        data: &HostNameBindingData,
    ) -> ProvisionResult<HostNameBinding>;

    async fn create_traffic_manager_profile(
        &self,
        group: &ResourceGroup,
        name: &str,
        data: &TrafficManagerProfileData,
    ) -> ProvisionResult<TrafficManagerProfile>;

    /// Delete a purchased domain registration.
    async fn delete_domain(&self, domain: &Domain) -> ProvisionResult<()>;

    /// Delete a resource group and everything inside it.
    async fn delete_resource_group(&self, group: &ResourceGroup) -> ProvisionResult<()>;
}

/// `/subscriptions/{sub}/resourceGroups/{group}`
#[must_use]
pub fn resource_group_path(subscription_id: &str, group: &str) -> String {
    format!("/subscriptions/{subscription_id}/resourceGroups/{group}")
}

/// Path of a provider resource inside a resource group.
///
/// Example: `provider_path("s", "rg", "Microsoft.Web", "sites",
/// "app")` ->
/// `/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/app`
#[must_use]
pub fn provider_path(
    subscription_id: &str,
    group: &str,
    provider: &str,
    resource_type: &str,
    name: &str,
) -> String {
    format!(
        "{}/providers/{provider}/{resource_type}/{name}",
        resource_group_path(subscription_id, group)
    )
}
