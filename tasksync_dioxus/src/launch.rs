use std::sync::Arc;

use dioxus::prelude::*;
use tasksync::{DataGateway, StoreClient, StoreConfig};

/// Launch a Dioxus desktop app with the task store wired up.
///
/// This handles the boilerplate:
/// - Creates a multi-threaded tokio runtime and enters it
/// - Builds the [`StoreClient`] for `config` (the connection itself is opened
///   on first use)
/// - Provides it via Dioxus context so components can call [`use_store()`]
/// - Launches Dioxus desktop
///
/// # Example
///
/// ```no_run
/// fn main() {
///     tasksync_dioxus::launch(tasksync::StoreConfig::from_env(), App);
/// }
///
/// fn App() -> dioxus::prelude::Element {
///     let store = tasksync_dioxus::use_store();
///     // ... build a TaskBoard over the store
///     todo!()
/// }
/// ```
pub fn launch(config: StoreConfig, app: fn() -> Element) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    let _guard = rt.enter();

    let client = StoreClient::new(config);
    if client.config().endpoint().is_none() {
        log::warn!("No task store endpoint configured; the store will be unavailable");
    }

    launch_with_store(Arc::new(client), app);
}

/// Launch with an already-built store, e.g. a [`MemoryGateway`](tasksync::MemoryGateway).
///
/// The store is handed to the root scope as context. Must be called from
/// within a tokio runtime context.
pub fn launch_with_store(store: Arc<dyn DataGateway>, app: fn() -> Element) {
    dioxus::LaunchBuilder::new().with_context(store).launch(app);
}

/// Convenience hook: retrieves the shared store handle from Dioxus context.
///
/// Must be called inside a component rendered under [`launch()`].
pub fn use_store() -> Arc<dyn DataGateway> {
    use_context::<Arc<dyn DataGateway>>()
}
