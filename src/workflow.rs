use std::path::PathBuf;

use tracing::{info, warn};

use crate::arm::ResourceManager;
use crate::cert::{self, CertificateIssuer, OpensslCertificate};
use crate::config::WorkflowConfig;
use crate::error::{ProvisionError, ProvisionResult};
use crate::model::{
    AppServicePlan, AppServicePlanData, Domain, DomainData, Endpoint, HostNameBinding,
    HostNameBindingData, ResourceGroup, ResourceGroupData, RoutingMethod, TrafficManagerProfile,
    TrafficManagerProfileData, WebApp, WebAppData,
};

/// Index into the three plans for each of the five web apps.
/// Plan 1 hosts apps 1, 4 and 5.
pub const WEB_APP_PLANS: [usize; 5] = [0, 1, 2, 0, 0];

/// Only the first three web apps sit behind the traffic manager.
pub const TRAFFIC_MANAGED_APPS: usize = 3;

/// Handles collected while the workflow runs.
#[derive(Debug, Clone, Default)]
pub struct Provisioned {
    pub resource_group: Option<ResourceGroup>,
    pub domain: Option<Domain>,
    pub certificate: Option<PathBuf>,
    pub plans: Vec<AppServicePlan>,
    pub web_apps: Vec<WebApp>,
    pub bindings: Vec<HostNameBinding>,
    pub traffic_manager: Option<TrafficManagerProfile>,
}

/// What a teardown step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Deleted,
    /// Nothing was created, so there is nothing to delete.
    NothingToCleanUp,
    /// Cleanup was switched off in the config.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teardown {
    pub domain: CleanupOutcome,
    pub resource_group: CleanupOutcome,
    pub certificate: CleanupOutcome,
}

/// Result of [`Workflow::run`].
#[derive(Debug)]
pub struct RunReport {
    pub provisioned: Provisioned,
    /// First failure of the forward steps, if any.
    pub error: Option<ProvisionError>,
    pub teardown: Teardown,
}

impl RunReport {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Provisions the domain, certificate, plans, web apps and
/// traffic manager, scales the plans up, then tears everything
/// down.
pub struct Workflow<M> {
    manager: M,
    certificates: Box<dyn CertificateIssuer>,
    config: WorkflowConfig,
}

impl<M: ResourceManager> Workflow<M> {
    #[must_use]
    pub fn new(manager: M, config: WorkflowConfig) -> Self {
        Self {
            manager,
            certificates: Box::new(OpensslCertificate::new()),
            config,
        }
    }

    #[must_use]
    pub fn certificates(mut self, issuer: impl CertificateIssuer + 'static) -> Self {
        self.certificates = Box::new(issuer);
        self
    }

    #[must_use]
    pub const fn manager(&self) -> &M {
        &self.manager
    }

    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run every step, then tear down regardless of the outcome.
    pub async fn run(&self) -> RunReport {
        let mut provisioned = Provisioned::default();
        let error = self.provision(&mut provisioned).await.err();
        let teardown = self.teardown(&provisioned).await;
        RunReport {
            provisioned,
            error,
            teardown,
        }
    }

    async fn provision(&self, state: &mut Provisioned) -> ProvisionResult<()> {
        let names = &self.config.names;
        let region = &self.config.region;

        let group = self
            .manager
            .create_resource_group(
                &names.resource_group,
                &ResourceGroupData {
                    location: region.clone(),
                },
            )
            .await?;
        info!("Created resource group {}", group.name);
        state.resource_group = Some(group.clone());

        // Purchase a domain (canceled again during teardown)
        info!("Purchasing a domain {}...", names.domain);
        let domain = self
            .manager
            .purchase_domain(&group, &names.domain, &DomainData::demo(region))
            .await?;
        info!("Purchased domain {}", domain.name);
        state.domain = Some(domain.clone());

        let pfx_path = &self.config.pfx_path;
        info!("Creating a self-signed certificate {}...", pfx_path.display());
        // Recorded first so teardown removes a partially written PFX.
        state.certificate = Some(pfx_path.clone());
        self.certificates
            .issue(&domain.name, pfx_path, &self.config.certificate_password)?;

        for name in &names.plans {
            info!("Creating app service plan {name}...");
        }
        let (plan1, plan2, plan3) = tokio::try_join!(
            self.create_plan(&group, &names.plans[0]),
            self.create_plan(&group, &names.plans[1]),
            self.create_plan(&group, &names.plans[2]),
        )?;
        state.plans = vec![plan1, plan2, plan3];

        for (name, &plan_index) in names.web_apps.iter().zip(WEB_APP_PLANS.iter()) {
            info!("Creating web app {name}...");
            let plan = &state.plans[plan_index];
            let (app, binding) = self.create_web_app(&group, &domain, name, plan).await?;
            info!("Created web app {}", app.name);
            state.web_apps.push(app);
            state.bindings.push(binding);
        }

        info!(
            "Creating a traffic manager {} for the web apps...",
            names.traffic_manager
        );
        let profile_data = traffic_manager_data(&names.traffic_manager, &state.web_apps);
        let profile = self
            .manager
            .create_traffic_manager_profile(&group, &names.traffic_manager, &profile_data)
            .await?;
        info!("Created traffic manager {}", profile.name);
        state.traffic_manager = Some(profile);

        for plan in &mut state.plans {
            info!("Scaling up app service plan {}...", plan.name);
            let patch = plan.scale_up_patch();
            let scaled = self.manager.update_app_service_plan(plan, &patch).await?;
            info!(
                "Scaled up app service plan {} to {} workers",
                scaled.name,
                scaled
                    .target_worker_count
                    .unwrap_or(patch.target_worker_count)
            );
            *plan = scaled;
        }

        Ok(())
    }

    /// Create a plan with the default configuration.
    pub async fn create_plan(
        &self,
        group: &ResourceGroup,
        name: &str,
    ) -> ProvisionResult<AppServicePlan> {
        let data = AppServicePlanData {
            location: self.config.region.clone(),
            ..AppServicePlanData::default()
        };
        let plan = self
            .manager
            .create_app_service_plan(group, name, &data)
            .await?;
        info!("Created app service plan {}", plan.name);
        Ok(plan)
    }

    /// Create a web app on `plan` and bind `<name>.<domain>` to it.
    pub async fn create_web_app(
        &self,
        group: &ResourceGroup,
        domain: &Domain,
        name: &str,
        plan: &AppServicePlan,
    ) -> ProvisionResult<(WebApp, HostNameBinding)> {
        let data = WebAppData {
            location: self.config.region.clone(),
            plan_id: plan.id.clone(),
            site_config: self.config.site_config.clone(),
        };
        let app = self.manager.create_web_app(group, name, &data).await?;

        let host_name = format!("{name}.{}", domain.name);
        let binding_data = HostNameBindingData::managed_sni(&domain.id);
        let binding = self
            .manager
            .create_host_name_binding(&app, &host_name, &binding_data)
            .await?;

        Ok((app, binding))
    }

    /// Delete the domain and the resource group, then remove the
    /// certificate file. Failures are logged, never returned.
    pub async fn teardown(&self, state: &Provisioned) -> Teardown {
        let domain = match (&state.domain, self.config.cleanup_domain) {
            (None, _) => CleanupOutcome::NothingToCleanUp,
            (Some(_), false) => CleanupOutcome::Skipped,
            (Some(domain), true) => {
                info!("Deleting domain {}", domain.name);
                match self.manager.delete_domain(domain).await {
                    Ok(()) => {
                        info!("Deleted domain {}", domain.name);
                        CleanupOutcome::Deleted
                    }
                    Err(e) => {
                        warn!("Failed to delete domain {}: {e}", domain.name);
                        CleanupOutcome::Failed(e.to_string())
                    }
                }
            }
        };

        let resource_group = match &state.resource_group {
            None => {
                info!("Nothing to clean up: no resource group was created");
                CleanupOutcome::NothingToCleanUp
            }
            Some(group) => {
                info!("Deleting Resource Group: {}", group.name);
                match self.manager.delete_resource_group(group).await {
                    Ok(()) => {
                        info!("Deleted Resource Group: {}", group.name);
                        CleanupOutcome::Deleted
                    }
                    Err(e) => {
                        warn!("Failed to delete resource group {}: {e}", group.name);
                        CleanupOutcome::Failed(e.to_string())
                    }
                }
            }
        };

        let certificate = match (&state.certificate, self.config.keep_certificate) {
            (None, _) => CleanupOutcome::NothingToCleanUp,
            (Some(_), true) => CleanupOutcome::Skipped,
            (Some(path), false) => match cert::remove_file(path) {
                Ok(true) => {
                    info!("Removed certificate {}", path.display());
                    CleanupOutcome::Deleted
                }
                Ok(false) => CleanupOutcome::NothingToCleanUp,
                Err(e) => {
                    warn!("Failed to remove certificate {}: {e}", path.display());
                    CleanupOutcome::Failed(e.to_string())
                }
            },
        };

        Teardown {
            domain,
            resource_group,
            certificate,
        }
    }
}

/// Weighted profile with one endpoint per traffic-managed app.
#[must_use]
pub fn traffic_manager_data(name: &str, apps: &[WebApp]) -> TrafficManagerProfileData {
    TrafficManagerProfileData {
        routing_method: RoutingMethod::Weighted,
        relative_dns_name: name.to_string(),
        endpoints: apps
            .iter()
            .take(TRAFFIC_MANAGED_APPS)
            .enumerate()
            .map(|(i, app)| Endpoint {
                name: format!("endpoint{}", i + 1),
                target_resource_id: app.id.clone(),
            })
            .collect(),
    }
}
