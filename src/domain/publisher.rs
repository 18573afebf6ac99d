//! Registry of known publisher signing identities.
//!
//! Built once by the composition root and passed by handle to whoever needs
//! it; there is no ambient process-wide registry.

use std::collections::HashMap;

use crate::domain::WalletAddress;
use crate::infra::AttestorError;

/// Maps publisher domains to their registered signer addresses.
#[derive(Debug, Clone, Default)]
pub struct PublisherRegistry {
    publishers: HashMap<String, WalletAddress>,
}

impl PublisherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a publisher domain with its signer address.
    pub fn register(&mut self, domain: impl Into<String>, address: WalletAddress) {
        self.publishers.insert(domain.into(), address);
    }

    /// Look up the registered signer address for a domain.
    pub fn resolve(&self, domain: &str) -> Option<&WalletAddress> {
        self.publishers.get(domain)
    }

    /// Like [`resolve`](Self::resolve), but unknown publishers become a
    /// validation-class error.
    pub fn require(&self, domain: &str) -> Result<&WalletAddress, AttestorError> {
        self.resolve(domain)
            .ok_or_else(|| AttestorError::UnknownPublisher(domain.to_string()))
    }

    /// Parse a `domain=0xaddress,domain=0xaddress` list, as supplied via
    /// configuration.
    pub fn from_spec(spec: &str) -> Result<Self, AttestorError> {
        let mut registry = PublisherRegistry::new();
        for entry in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (domain, address) =
                entry
                    .split_once('=')
                    .ok_or_else(|| AttestorError::Validation {
                        field: "publishers",
                        message: format!("expected domain=address, got '{entry}'"),
                    })?;
            registry.register(domain.trim(), WalletAddress::parse(address)?);
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}
