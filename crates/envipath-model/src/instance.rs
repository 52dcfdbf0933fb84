//! Entry point to one enviPath instance.

use crate::account::{Group, User};
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::fetcher::SharedFetcher;
use crate::package::Package;
use crate::resource::{list_collection, Resource, ResourceType};
use crate::setting::Setting;
use std::sync::Arc;

/// Handle on the top-level collections of an instance.
///
/// Collections live at `<base_url><endpoint>` of the fetcher. Single lookups
/// fetch eagerly, so asking for a deleted or unknown identifier fails here
/// instead of at the first attribute read.
#[derive(Clone)]
pub struct EnviPath {
    fetcher: SharedFetcher,
}

impl EnviPath {
    pub fn new(fetcher: SharedFetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &SharedFetcher {
        &self.fetcher
    }

    pub fn base_url(&self) -> &str {
        self.fetcher.base_url()
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.list(Endpoint::User)
    }

    pub fn groups(&self) -> Result<Vec<Group>> {
        self.list(Endpoint::Group)
    }

    pub fn packages(&self) -> Result<Vec<Package>> {
        self.list(Endpoint::Package)
    }

    pub fn settings(&self) -> Result<Vec<Setting>> {
        self.list(Endpoint::Setting)
    }

    pub fn user(&self, id: &str) -> Result<User> {
        self.lookup(id)
    }

    pub fn group(&self, id: &str) -> Result<Group> {
        self.lookup(id)
    }

    pub fn package(&self, id: &str) -> Result<Package> {
        self.lookup(id)
    }

    pub fn setting(&self, id: &str) -> Result<Setting> {
        self.lookup(id)
    }

    /// Creates a package owned by `group` on this instance.
    pub fn create_package(
        &self,
        group: &Group,
        name: &str,
        description: Option<&str>,
    ) -> Result<Package> {
        Package::create(&self.fetcher, group, name, description)
    }

    fn list<T: ResourceType>(&self, endpoint: Endpoint) -> Result<Vec<T>> {
        let uri = format!("{}{}", self.fetcher.base_url(), endpoint);
        list_collection(&self.fetcher, &uri, endpoint, T::KIND)
    }

    fn lookup<T: ResourceType>(&self, id: &str) -> Result<T> {
        let attributes = self.fetcher.fetch(id)?;
        tracing::debug!(kind = %T::KIND, id, "looked up resource");
        Ok(T::wrap(Resource::hydrated(
            T::KIND,
            Arc::clone(&self.fetcher),
            id,
            attributes,
        )))
    }
}

impl From<SharedFetcher> for EnviPath {
    fn from(fetcher: SharedFetcher) -> Self {
        Self::new(fetcher)
    }
}

impl std::fmt::Debug for EnviPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnviPath")
            .field("base_url", &self.base_url())
            .finish()
    }
}
