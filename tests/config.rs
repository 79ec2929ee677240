use std::collections::HashMap;
use std::path::Path;

use webapp_traffic::config::{
    Credentials, ResourceNames, WorkflowConfig, generate_password, pfx_file_name, random_name,
};
use webapp_traffic::error::ProvisionError;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

const ALL: [(&str, &str); 4] = [
    ("CLIENT_ID", "client"),
    ("CLIENT_SECRET", "secret"),
    ("TENANT_ID", "tenant"),
    ("SUBSCRIPTION_ID", "sub"),
];

#[test]
fn credentials_from_lookup() {
    let creds = Credentials::from_lookup(lookup(&ALL)).unwrap();

    assert_eq!(creds.client_id, "client");
    assert_eq!(creds.client_secret, "secret");
    assert_eq!(creds.tenant_id, "tenant");
    assert_eq!(creds.subscription_id, "sub");
}

#[test]
fn credentials_missing_variable() {
    let err = Credentials::from_lookup(lookup(&ALL[..3])).unwrap_err();
    assert!(matches!(err, ProvisionError::EnvMissing(ref k) if k == "SUBSCRIPTION_ID"));
}

#[test]
fn credentials_empty_value_counts_as_missing() {
    let mut pairs = ALL;
    pairs[1] = ("CLIENT_SECRET", "  ");
    let err = Credentials::from_lookup(lookup(&pairs)).unwrap_err();
    assert!(matches!(err, ProvisionError::EnvMissing(ref k) if k == "CLIENT_SECRET"));
}

#[test]
fn credentials_debug_hides_secret() {
    let creds = Credentials::from_lookup(lookup(&ALL)).unwrap();
    let debug = format!("{creds:?}");
    assert!(debug.contains("client"));
    assert!(!debug.contains("secret\""));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn random_name_keeps_prefix() {
    let name = random_name("webapp1-");
    assert!(name.starts_with("webapp1-"));
    assert_eq!(name.len(), "webapp1-".len() + 8);
    assert!(
        name["webapp1-".len()..]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    );
}

#[test]
fn random_names_differ() {
    assert_ne!(random_name("x"), random_name("x"));
}

#[test]
fn generated_password_is_alphanumeric() {
    let password = generate_password();
    assert_eq!(password.len(), 20);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn resource_names_prefixes() {
    let names = ResourceNames::random();

    assert!(names.resource_group.starts_with("rgNEMV_"));
    assert!(names.domain.starts_with("jsdkdemo-"));
    assert!(names.domain.ends_with(".com"));
    assert!(names.plans[2].starts_with("jplan3_"));
    assert!(names.web_apps[4].starts_with("webapp5-"));
    assert!(names.traffic_manager.starts_with("jsdktm-"));
}

#[test]
fn workflow_config_defaults() {
    let config = WorkflowConfig::new("westeurope");

    assert_eq!(config.region, "westeurope");
    assert_eq!(config.pfx_path, Path::new(&pfx_file_name()));
    assert_eq!(config.site_config.net_framework_version, "v4.6");
    assert!(config.cleanup_domain);
    assert!(!config.keep_certificate);
    assert!(!config.certificate_password.is_empty());
}

#[test]
fn workflow_config_builder_chain() {
    let config = WorkflowConfig::new("eastus")
        .certificate_dir(Path::new("/tmp/certs"))
        .certificate_password("hunter2")
        .cleanup_domain(false)
        .keep_certificate(true);

    assert_eq!(config.pfx_path, Path::new("/tmp/certs").join(pfx_file_name()));
    assert_eq!(config.certificate_password, "hunter2");
    assert!(!config.cleanup_domain);
    assert!(config.keep_certificate);
}

#[test]
fn pfx_name_comes_from_package() {
    assert_eq!(pfx_file_name(), "webapp_webapp_traffic.pfx");
}
