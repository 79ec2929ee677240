//! Provision App Service web apps behind a weighted traffic
//! manager, scale them up, and tear everything down again.
//!
//! # Overview
//!
//! A run is a [`Workflow`] that drives a
//! [`ResourceManager`](arm::ResourceManager) through a fixed
//! sequence of steps:
//!
//! 1. Create a resource group
//! 2. Purchase a domain (privacy on, auto-renew off)
//! 3. Generate a self-signed PFX for the domain via a
//!    [`CertificateIssuer`](cert::CertificateIssuer)
//!    (default: [`OpensslCertificate`])
//! 4. Create three App Service plans, concurrently
//! 5. Create five web apps on those plans, each with a managed
//!    SNI host-name binding
//! 6. Put web apps 1-3 behind a weighted traffic manager
//! 7. Scale every plan to twice its worker count
//!
//! Teardown always follows: the domain is deleted, the resource
//! group is deleted exactly once, and the PFX is removed.
//! Teardown failures are logged and reported, never raised.
//!
//! Every remote call waits for its long-running operation to
//! finish, so each step only ever references resources that
//! already exist.
//!
//! # Example
//!
//! ```rust,no_run
//! use webapp_traffic::{ArmClient, Credentials, Workflow, WorkflowConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = ArmClient::new(Credentials::from_env()?)?;
//! let config = WorkflowConfig::new("eastus");
//!
//! let report = Workflow::new(client, config).run().await;
//! if let Some(e) = &report.error {
//!     eprintln!("run failed: {e}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Testing against a fake
//!
//! [`ResourceManager`](arm::ResourceManager) is the only seam to
//! the remote API, so tests substitute an in-memory
//! implementation and assert on the calls it received.

// Allow noisy pedantic lints that don't add value for a
// provisioning tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod arm;
pub mod cert;
pub mod cmd;
pub mod config;
pub mod error;
pub mod model;
pub mod workflow;

pub use arm::ResourceManager;
pub use arm::client::ArmClient;
pub use cert::{CertificateIssuer, OpensslCertificate};
pub use config::{Credentials, ResourceNames, WorkflowConfig};
pub use error::{ProvisionError, ProvisionResult};
pub use workflow::{CleanupOutcome, Provisioned, RunReport, Teardown, Workflow};
