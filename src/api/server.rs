use crate::api::routes;
use crate::config::Shared;
use crate::error::Error;
use crate::txt_store::DynTxtStore;
use axum::routing::IntoMakeService;
use axum::Router;
use hyper::server::conn::AddrIncoming;

#[derive(Clone)]
pub(super) struct AppState {
    pub config: Shared,
    pub txt_store: DynTxtStore,
}

/// The control API server, ready to be awaited (or spawned).
pub type ApiServer = hyper::Server<AddrIncoming, IntoMakeService<Router>>;

/// Bind the control API listener described by `config`.
///
/// # Errors
///
/// Returns [`Error::InsecureAPIBind`] if the bind address isn't loopback or private, and
/// [`Error::HTTPError`] if the listener can't be bound.
pub fn new(config: Shared, txt_store: DynTxtStore) -> Result<ApiServer, Error> {
    config.bind_addr_is_secure()?;
    let bind_addr = config.api_bind_addr;
    let router = routes::new(AppState { config, txt_store });
    Ok(axum::Server::try_bind(&bind_addr)?.serve(router.into_make_service()))
}
