use crate::crux::CruxClient;

/// Shared application state passed to all handlers.
/// The CrUX client (and the API key inside it) is built once at startup
/// rather than re-reading the environment on every request.
#[derive(Clone)]
pub struct AppState {
    pub crux: CruxClient,
}
