use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::arm::lro::{self, OperationStatus, PollTarget};
use crate::arm::{self, ResourceManager, wire};
use crate::config::Credentials;
use crate::error::{ProvisionError, ProvisionResult};
use crate::model::{
    AppServicePlan, AppServicePlanData, AppServicePlanPatch, Domain, DomainData, HostNameBinding,
    HostNameBindingData, ResourceGroup, ResourceGroupData, TrafficManagerProfile,
    TrafficManagerProfileData, WebApp, WebAppData,
};

pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

const RESOURCES_API: &str = "2022-09-01";
const SUBSCRIPTION_API: &str = "2022-12-01";
const WEB_API: &str = "2022-09-01";
const DOMAIN_API: &str = "2022-09-01";
const TRAFFIC_MANAGER_API: &str = "2022-04-01";

/// Tokens are refreshed this long before they expire.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Resource manager backed by the ARM REST API.
///
/// Authenticates as a service principal with the client
/// credentials flow and waits on every long-running operation
/// before returning.
pub struct ArmClient {
    http: Client,
    credentials: Credentials,
    endpoint: String,
    authority: String,
    poll_interval: Duration,
    token: Mutex<Option<CachedToken>>,
}

impl ArmClient {
    pub fn new(credentials: Credentials) -> ProvisionResult<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            http,
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            poll_interval: Duration::from_secs(5),
            token: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn authority(mut self, authority: &str) -> Self {
        self.authority = authority.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Display name of the configured subscription, falling back
    /// to its id.
    pub async fn subscription_display_name(&self) -> ProvisionResult<String> {
        let path = format!("/subscriptions/{}", self.credentials.subscription_id);
        let body = self.get(&path, SUBSCRIPTION_API).await?;
        Ok(body["displayName"]
            .as_str()
            .map_or_else(|| self.credentials.subscription_id.clone(), String::from))
    }

    fn url(&self, path: &str, api_version: &str) -> String {
        format!("{}{path}?api-version={api_version}", self.endpoint)
    }

    fn group_path(&self, group: &str) -> String {
        arm::resource_group_path(&self.credentials.subscription_id, group)
    }

    fn resource_path(
        &self,
        group: &str,
        provider: &str,
        resource_type: &str,
        name: &str,
    ) -> String {
        arm::provider_path(
            &self.credentials.subscription_id,
            group,
            provider,
            resource_type,
            name,
        )
    }

    async fn access_token(&self) -> ProvisionResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached
            .as_ref()
            .filter(|t| Instant::now() + TOKEN_SLACK < t.expires_at)
        {
            return Ok(token.value.clone());
        }

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority, self.credentials.tenant_id
        );
        debug!(%url, "requesting access token");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("scope", MANAGEMENT_SCOPE),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProvisionError::Authentication(format!(
                "{status}: {}",
                wire::error_message(&body)
            )));
        }

        let token: TokenResponse = response.json().await?;
        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> ProvisionResult<Response> {
        let token = self.access_token().await?;
        debug!(%method, %url, "sending request");

        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            Err(ProvisionError::Api {
                url: url.to_string(),
                status,
                message: wire::error_message(&text),
            })
        }
    }

    async fn get(&self, path: &str, api_version: &str) -> ProvisionResult<Value> {
        let url = self.url(path, api_version);
        let response = self.send(Method::GET, &url, None).await?;
        Ok(response.json().await?)
    }

    /// Send a write and, if the service accepted it as a
    /// long-running operation, wait for it to finish.
    ///
    /// Returns the final resource body, or `None` when the
    /// operation produced none (deletes).
    async fn execute(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        body: Option<&Value>,
    ) -> ProvisionResult<Option<Value>> {
        let url = self.url(path, api_version);
        let response = self.send(method.clone(), &url, body).await?;
        let status = response.status();
        let headers = response.headers().clone();

        let target = lro::poll_target(
            status.as_u16(),
            header(&headers, lro::ASYNC_OPERATION_HEADER),
            header(&headers, lro::LOCATION_HEADER),
        );

        let Some(target) = target else {
            return read_body(response).await;
        };

        let delay = lro::retry_after(
            header(&headers, lro::RETRY_AFTER_HEADER),
            self.poll_interval,
        );
        let final_body = self.wait(&target, delay).await?;

        match final_body {
            Some(body) => Ok(Some(body)),
            None if method == Method::DELETE => Ok(None),
            None => self.get(path, api_version).await.map(Some),
        }
    }

    /// Poll `target` until the operation is terminal.
    async fn wait(
        &self,
        target: &PollTarget,
        first_delay: Duration,
    ) -> ProvisionResult<Option<Value>> {
        let mut delay = first_delay;
        loop {
            tokio::time::sleep(delay).await;

            let response = self.send(Method::GET, target.url(), None).await?;
            let status = response.status();
            delay = lro::retry_after(
                header(response.headers(), lro::RETRY_AFTER_HEADER),
                self.poll_interval,
            );

            match target {
                PollTarget::AsyncOperation(url) => {
                    let body: Value = response.json().await?;
                    let reported = wire::operation_status(&body).unwrap_or("InProgress");
                    match OperationStatus::parse(reported) {
                        OperationStatus::Succeeded => return Ok(None),
                        s if s.is_terminal() => {
                            return Err(ProvisionError::OperationFailed {
                                operation: url.clone(),
                                status: s.as_str().to_string(),
                                message: wire::operation_error(&body),
                            });
                        }
                        s => debug!(status = s.as_str(), "operation still running"),
                    }
                }
                PollTarget::Location(_) if status == StatusCode::ACCEPTED => {
                    debug!("operation still running");
                }
                PollTarget::Location(_) => return read_body(response).await,
            }
        }
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        body: &Value,
    ) -> ProvisionResult<Value> {
        match self.execute(method, path, api_version, Some(body)).await? {
            Some(body) => Ok(body),
            None => self.get(path, api_version).await,
        }
    }

    async fn put(&self, path: &str, api_version: &str, body: &Value) -> ProvisionResult<Value> {
        self.write(Method::PUT, path, api_version, body).await
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn read_body(response: Response) -> ProvisionResult<Option<Value>> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::from_str(&text)?))
    }
}

#[async_trait]
impl ResourceManager for ArmClient {
    async fn create_resource_group(
        &self,
        name: &str,
        data: &ResourceGroupData,
    ) -> ProvisionResult<ResourceGroup> {
        let path = self.group_path(name);
        let body = self
            .put(&path, RESOURCES_API, &wire::resource_group_body(data))
            .await?;
        wire::parse_resource_group(body)
    }

    async fn purchase_domain(
        &self,
        group: &ResourceGroup,
        name: &str,
        data: &DomainData,
    ) -> ProvisionResult<Domain> {
        let path = self.resource_path(&group.name, arm::DOMAIN_PROVIDER, "domains", name);
        let body = self.put(&path, DOMAIN_API, &wire::domain_body(data)).await?;
        wire::parse_domain(body)
    }

    async fn create_app_service_plan(
        &self,
        group: &ResourceGroup,
        name: &str,
        data: &AppServicePlanData,
    ) -> ProvisionResult<AppServicePlan> {
        let path = self.resource_path(&group.name, arm::WEB_PROVIDER, "serverfarms", name);
        let body = self.put(&path, WEB_API, &wire::plan_body(data)).await?;
        wire::parse_plan(body)
    }

    async fn update_app_service_plan(
        &self,
        plan: &AppServicePlan,
        patch: &AppServicePlanPatch,
    ) -> ProvisionResult<AppServicePlan> {
        let body = self
            .write(Method::PATCH, &plan.id, WEB_API, &wire::plan_patch_body(patch))
            .await?;
        wire::parse_plan(body)
    }

    async fn create_web_app(
        &self,
        group: &ResourceGroup,
        name: &str,
        data: &WebAppData,
    ) -> ProvisionResult<WebApp> {
        let path = self.resource_path(&group.name, arm::WEB_PROVIDER, "sites", name);
        let body = self.put(&path, WEB_API, &wire::web_app_body(data)).await?;
        wire::parse_web_app(body)
    }

    async fn create_host_name_binding(
        &self,
        app: &WebApp,
        host_name: &str,
        data: &HostNameBindingData,
    ) -> ProvisionResult<HostNameBinding> {
        let path = format!("{}/hostNameBindings/{host_name}", app.id);
        let body = self
            .put(&path, WEB_API, &wire::host_name_binding_body(data))
            .await?;
        wire::parse_host_name_binding(body)
    }

    async fn create_traffic_manager_profile(
        &self,
        group: &ResourceGroup,
        name: &str,
        data: &TrafficManagerProfileData,
    ) -> ProvisionResult<TrafficManagerProfile> {
        let path = self.resource_path(
            &group.name,
            arm::NETWORK_PROVIDER,
            "trafficmanagerprofiles",
            name,
        );
        let body = self
            .put(&path, TRAFFIC_MANAGER_API, &wire::traffic_manager_body(data))
            .await?;
        wire::parse_traffic_manager(body)
    }

    async fn delete_domain(&self, domain: &Domain) -> ProvisionResult<()> {
        self.execute(Method::DELETE, &domain.id, DOMAIN_API, None)
            .await?;
        Ok(())
    }

    async fn delete_resource_group(&self, group: &ResourceGroup) -> ProvisionResult<()> {
        let path = self.group_path(&group.name);
        self.execute(Method::DELETE, &path, RESOURCES_API, None)
            .await?;
        Ok(())
    }
}
