//! Reference resolution
//!
//! Turns a parsed [`ExtensionRef`] into concrete [`DistributionInfo`]:
//! registry lookup for `name[@version]` references, descriptor fetch from
//! the trusted source-repository host for URL references.

mod registry;
mod repo;

use crate::core::types::{DistributionInfo, ExtensionRef};
use crate::error::Result;
use crate::remote::Fetcher;

pub struct Resolver<'a> {
    fetcher: &'a dyn Fetcher,
    registry_base: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, registry_base: &'a str) -> Self {
        Self {
            fetcher,
            registry_base,
        }
    }

    pub fn resolve(&self, reference: &ExtensionRef) -> Result<DistributionInfo> {
        match reference {
            ExtensionRef::Registry { name, version } => {
                registry::resolve(self.fetcher, self.registry_base, name, version.as_deref())
            }
            ExtensionRef::SourceRepo { url } => repo::resolve(self.fetcher, url),
        }
    }
}
