//! atrium-appwrite: Appwrite REST admin client and the adapters that plug it
//! into atrium-core and atrium-auth.

pub mod account;
pub mod adapter;
pub mod client;
pub mod databases;
pub mod error;
pub mod models;
pub mod permission;
pub mod teams;

pub use account::{Account, AccountSessionStrategy};
pub use adapter::{AppwriteTenantDirectory, AppwriteWorkspaceRepository};
pub use client::{AppwriteClient, ID};
pub use databases::Databases;
pub use error::PlatformError;
pub use permission::{Permission, Role};
pub use teams::Teams;
