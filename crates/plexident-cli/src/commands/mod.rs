pub mod login;
pub mod logout;
pub mod patients;
pub mod users;
pub mod whoami;

use std::sync::Arc;

use plexident_client::{ClientOptions, PlexidentClient};
use plexident_core::env;
use plexident_core::FileCredentialStore;

/// Build a client over the on-disk credential store. The server is
/// resolved the same way in every command: `--base-url` first, then
/// the environment.
pub(crate) fn client(base_url: Option<String>) -> PlexidentClient {
    let base_url = base_url.unwrap_or_else(env::api_url_from_env);
    PlexidentClient::new(
        ClientOptions {
            base_url,
            ..Default::default()
        },
        Arc::new(FileCredentialStore::new()),
    )
}
