//! Candidate storage scopes, most specific first.
//!
//! The order mirrors the platform's own precedence, so the first scope whose
//! raw value matches the effective value is the one actually in force.

use crate::domain::model::{HostScope, UserScope, GLOBAL_DOMAIN};
use std::path::{Path, PathBuf};

/// Which domain a scope is queried with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeDomain {
    /// The domain being inspected
    App,
    /// The shared `.GlobalPreferences` domain
    Global,
}

/// Which preferences directory a scope file lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// `~/Library/Preferences`
    UserLibrary,
    /// `/Library/Preferences`
    SystemLibrary,
}

/// One row of the scope table.
#[derive(Debug, Clone, Copy)]
pub struct ScopeTemplate {
    pub location: Location,
    /// File sits under `ByHost/` with the host id before the extension.
    pub by_host: bool,
    pub domain: ScopeDomain,
    pub user: UserScope,
    pub host: HostScope,
}

pub const SCOPE_TABLE: [ScopeTemplate; 6] = [
    ScopeTemplate {
        location: Location::UserLibrary,
        by_host: true,
        domain: ScopeDomain::App,
        user: UserScope::Current,
        host: HostScope::Current,
    },
    ScopeTemplate {
        location: Location::UserLibrary,
        by_host: false,
        domain: ScopeDomain::App,
        user: UserScope::Current,
        host: HostScope::Any,
    },
    ScopeTemplate {
        location: Location::UserLibrary,
        by_host: true,
        domain: ScopeDomain::Global,
        user: UserScope::Current,
        host: HostScope::Current,
    },
    ScopeTemplate {
        location: Location::UserLibrary,
        by_host: false,
        domain: ScopeDomain::Global,
        user: UserScope::Current,
        host: HostScope::Any,
    },
    ScopeTemplate {
        location: Location::SystemLibrary,
        by_host: false,
        domain: ScopeDomain::App,
        user: UserScope::Any,
        host: HostScope::Current,
    },
    ScopeTemplate {
        location: Location::SystemLibrary,
        by_host: false,
        domain: ScopeDomain::Global,
        user: UserScope::Any,
        host: HostScope::Any,
    },
];

impl ScopeTemplate {
    /// Path of the plist backing this scope for `domain`.
    pub fn file_path(&self, domain: &str, home: &Path, host_id: &str) -> PathBuf {
        let mut dir = match self.location {
            Location::UserLibrary => home.join("Library").join("Preferences"),
            Location::SystemLibrary => PathBuf::from("/Library/Preferences"),
        };
        let name = match self.domain {
            ScopeDomain::App => domain,
            ScopeDomain::Global => GLOBAL_DOMAIN,
        };
        let file_name = if self.by_host {
            dir.push("ByHost");
            format!("{}.{}.plist", name, host_id)
        } else {
            format!("{}.plist", name)
        };
        dir.join(file_name)
    }
}

/// A scope made concrete for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageScope {
    pub file: String,
    pub domain: String,
    pub user: UserScope,
    pub host: HostScope,
}

/// Renders the scope table for `domain`, in precedence order.
pub fn storage_scopes(domain: &str, home: &Path, host_id: &str) -> Vec<StorageScope> {
    SCOPE_TABLE
        .iter()
        .map(|template| {
            let query_domain = match template.domain {
                ScopeDomain::App => domain.to_string(),
                ScopeDomain::Global => GLOBAL_DOMAIN.to_string(),
            };
            StorageScope {
                file: template
                    .file_path(domain, home, host_id)
                    .to_string_lossy()
                    .into_owned(),
                domain: query_domain,
                user: template.user,
                host: template.host,
            }
        })
        .collect()
}
