use std::path::Path;

use crate::cmd;
use crate::error::{ProvisionError, ProvisionResult};

/// Produces the TLS certificate for the purchased domain.
pub trait CertificateIssuer: Send + Sync {
    /// Write a password-protected PFX for `domain` to `pfx_path`.
    fn issue(&self, domain: &str, pfx_path: &Path, password: &str) -> ProvisionResult<()>;
}

/// Self-signed certificate issuer using the `openssl` CLI.
///
/// The private key and certificate are written next to the PFX,
/// bundled with `openssl pkcs12 -export`, then removed. The export
/// password is passed on stdin.
///
/// # Example
///
/// ```
/// use webapp_traffic::OpensslCertificate;
///
/// let openssl = OpensslCertificate::new().validity_days(30);
/// assert_eq!(openssl.validity_days, 30);
/// assert_eq!(openssl.key_bits, 2048);
/// ```
pub struct OpensslCertificate {
    pub validity_days: u32,
    pub key_bits: u32,
}

impl OpensslCertificate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            validity_days: 365,
            key_bits: 2048,
        }
    }

    #[must_use]
    pub const fn validity_days(mut self, days: u32) -> Self {
        self.validity_days = days;
        self
    }

    #[must_use]
    pub const fn key_bits(mut self, bits: u32) -> Self {
        self.key_bits = bits;
        self
    }

    pub fn check_prerequisites() -> ProvisionResult<()> {
        if cmd::command_exists("openssl") {
            Ok(())
        } else {
            Err(ProvisionError::PrerequisiteMissing(
                "openssl is not installed".into(),
            ))
        }
    }

    /// Arguments for the self-signed `openssl req` call.
    #[must_use]
    pub fn req_args(&self, domain: &str, key_path: &str, cert_path: &str) -> Vec<String> {
        vec![
            "req".into(),
            "-x509".into(),
            "-newkey".into(),
            format!("rsa:{}", self.key_bits),
            "-nodes".into(),
            "-sha256".into(),
            "-days".into(),
            self.validity_days.to_string(),
            "-subj".into(),
            format!("/CN={domain}"),
            "-addext".into(),
            format!("subjectAltName=DNS:{domain},DNS:*.{domain}"),
            "-keyout".into(),
            key_path.into(),
            "-out".into(),
            cert_path.into(),
        ]
    }

    /// Arguments for bundling key and certificate into a PFX.
    #[must_use]
    pub fn export_args(key_path: &str, cert_path: &str, pfx_path: &str) -> Vec<String> {
        vec![
            "pkcs12".into(),
            "-export".into(),
            "-inkey".into(),
            key_path.into(),
            "-in".into(),
            cert_path.into(),
            "-out".into(),
            pfx_path.into(),
            "-passout".into(),
            "stdin".into(),
        ]
    }
}

impl Default for OpensslCertificate {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateIssuer for OpensslCertificate {
    fn issue(&self, domain: &str, pfx_path: &Path, password: &str) -> ProvisionResult<()> {
        Self::check_prerequisites()?;

        let key_path = pfx_path.with_extension("key");
        let cert_path = pfx_path.with_extension("crt");
        let key = key_path.to_string_lossy();
        let cert = cert_path.to_string_lossy();
        let pfx = pfx_path.to_string_lossy();

        let req = self.req_args(domain, &key, &cert);
        let req_refs: Vec<&str> = req.iter().map(String::as_str).collect();
        let result = cmd::run("openssl", &req_refs).and_then(|_| {
            let export = Self::export_args(&key, &cert, &pfx);
            let export_refs: Vec<&str> = export.iter().map(String::as_str).collect();
            cmd::run_with_stdin("openssl", &export_refs, format!("{password}\n").as_bytes())
        });

        for intermediate in [&key_path, &cert_path] {
            remove_if_present(intermediate);
        }

        result.map(|_| ())
    }
}

/// Remove a file, ignoring a missing one.
pub fn remove_file(path: &Path) -> ProvisionResult<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn remove_if_present(path: &Path) {
    if let Err(e) = remove_file(path) {
        tracing::debug!(path = %path.display(), error = %e, "could not remove intermediate file");
    }
}
