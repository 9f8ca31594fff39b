//! Tideway Tenancy - multi-tenant organization authorization for Axum services
//!
//! Decides which authenticated principal may act on which organization, and
//! under which role. Built on Axum and Tokio with pluggable storage.
//!
//! # Features
//!
//! - **Org context**: the target organization travels in one request header
//! - **Memberships**: at most one per (user, org), enforced by the store
//! - **Explicit roles**: owner, admin and member with no implied hierarchy
//! - **Invites**: idempotent add-or-update of a member's role
//! - **Database**: optional SeaORM store behind the `database` feature
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tideway_tenancy::organizations::{
//!     AuthorizationGate, InMemoryOrgStore, OrgContextResolver, OrganizationManager,
//! };
//! use tideway_tenancy::ConfigBuilder;
//!
//! fn main() -> tideway_tenancy::Result<()> {
//!     let config = ConfigBuilder::new().from_env().build()?;
//!     tideway_tenancy::init_tracing_with_config(&config);
//!
//!     let store = InMemoryOrgStore::new();
//!     let gate = AuthorizationGate::new(store.clone(), OrgContextResolver::from_config(&config.orgs)?);
//!     let _orgs = OrganizationManager::new(store, gate, config.orgs.clone());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod organizations;
mod utils;

pub use config::{Config, ConfigBuilder, LoggingConfig};
pub use error::{ErrorResponse, Result, TenancyError};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with sensible defaults
///
/// Reads `RUST_LOG` for the filter and `TENANCY_LOG_JSON` for JSON output.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = utils::get_env_with_prefix("LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
