use super::*;
use crossbeam_channel::{bounded, unbounded};
use std::thread;

#[test]
fn dispatcher_writes_queued_frames_in_order() {
    let (tx, rx) = unbounded();
    let (_shutdown_tx, shutdown_rx) = bounded::<()>(0);
    tx.send(r#"{"Event":"SubscribeStream","ReqID":1}"#.to_string()).unwrap();
    tx.send(STATUS_PROBE.to_string()).unwrap();
    drop(tx);

    let mut wire = Vec::new();
    OutboundSender::new(&mut wire).run(rx, shutdown_rx).unwrap();

    assert_eq!(
        String::from_utf8(wire).unwrap(),
        "{\"Event\":\"SubscribeStream\",\"ReqID\":1}\nSTATUS\n"
    );
}

#[test]
fn dispatcher_stops_on_shutdown() {
    let (_tx, rx) = unbounded::<String>();
    let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
    let handle = thread::spawn(move || OutboundSender::new(Vec::new()).run(rx, shutdown_rx));

    drop(shutdown_tx);
    assert!(handle.join().unwrap().is_ok());
}

#[test]
fn keepalive_probes_immediately_and_periodically() {
    let (tx, rx) = unbounded();
    let tracker = Arc::new(RequestTracker::new(tx));
    let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
    let handle = {
        let tracker = Arc::clone(&tracker);
        thread::spawn(move || run_keepalive(tracker, Duration::from_millis(10), shutdown_rx))
    };

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), STATUS_PROBE);
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), STATUS_PROBE);
    drop(shutdown_tx);
    handle.join().unwrap();

    assert!(tracker.all_settled().unwrap());
}
