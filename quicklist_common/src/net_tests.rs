use super::*;

#[test]
fn socket_address_parses_as_tcp() {
    let endpoint: Endpoint = "127.0.0.1:7000".parse().unwrap();
    assert_eq!(endpoint, Endpoint::Tcp("127.0.0.1:7000".parse().unwrap()));
}

#[test]
fn plain_path_parses_as_unix() {
    let endpoint: Endpoint = DEFAULT_SOCKET_PATH.parse().unwrap();
    assert_eq!(endpoint, Endpoint::Unix(PathBuf::from("/tmp/quicklist.sock")));
}

#[test]
fn prefixes_force_the_kind() {
    let endpoint: Endpoint = "unix:relative.sock".parse().unwrap();
    assert_eq!(endpoint, Endpoint::Unix(PathBuf::from("relative.sock")));
    assert!("tcp:not-an-address".parse::<Endpoint>().is_err());
}

#[test]
fn empty_endpoint_is_rejected() {
    assert!("  ".parse::<Endpoint>().is_err());
    assert!("unix:".parse::<Endpoint>().is_err());
}

#[test]
fn display_round_trips_through_prefix() {
    let endpoint = Endpoint::Unix(PathBuf::from("/tmp/q.sock"));
    assert_eq!(endpoint.to_string(), "unix:/tmp/q.sock");
    assert_eq!(endpoint.to_string().parse::<Endpoint>().unwrap(), endpoint);
}
