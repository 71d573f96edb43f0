use std::net::TcpListener;
use url::Url;

/// URL of a local port nobody listens on
///
/// Binds an ephemeral port and releases it, so connecting fails fast with
/// "connection refused" instead of waiting for a timeout.
pub fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind ephemeral port");
    let port = listener
        .local_addr()
        .expect("Failed to read local address")
        .port();
    drop(listener);

    Url::parse(&format!("http://127.0.0.1:{}/", port)).expect("valid loopback URL")
}
