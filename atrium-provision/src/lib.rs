//! atrium-provision: the create-workspace function.
//!
//! [`Provisioner`] runs the saga against the core ports; [`function`] decodes
//! one invocation, wires the Appwrite adapters from its `env`, and encodes the
//! response.

pub mod function;
pub mod logging;
pub mod notify;
pub mod provisioner;
pub mod settings;

pub use function::{
    build_provisioner, handle, parse_invocation, run, run_from, FunctionResponse, Invocation,
};
pub use logging::init_tracing;
pub use notify::{Notifier, WebhookNotifier, WorkspaceCreated};
pub use provisioner::Provisioner;
pub use settings::{PlatformSettings, ProvisionSettings, WebhookSettings};
