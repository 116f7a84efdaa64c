use super::*;
use std::collections::VecDeque;
use std::io::Cursor;

/// Reader that returns the given chunks one `read` at a time.
struct ChunkedReader {
    chunks: VecDeque<Vec<u8>>,
}

impl ChunkedReader {
    fn new(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.chunks.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

#[test]
fn several_frames_in_one_read_are_split() {
    let mut reader = FrameReader::new(Cursor::new(b"UP\n{\"Event\":\"X\"}\nDOWN\n".to_vec()), 1024);
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("UP"));
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("{\"Event\":\"X\"}"));
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("DOWN"));
    assert_eq!(reader.read_frame().unwrap(), None);
}

#[test]
fn frame_split_across_reads_is_reassembled() {
    let inner = ChunkedReader::new(&[b"{\"Event\":", b"\"GetOw", b"ners\"}\nQUE", b"UE\n"]);
    let mut reader = FrameReader::new(inner, 1024);
    assert_eq!(
        reader.read_frame().unwrap().as_deref(),
        Some("{\"Event\":\"GetOwners\"}")
    );
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("QUEUE"));
    assert_eq!(reader.read_frame().unwrap(), None);
}

#[test]
fn empty_frames_are_returned_as_empty_text() {
    let mut reader = FrameReader::new(Cursor::new(b"\nUP\n".to_vec()), 16);
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some(""));
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("UP"));
}

#[test]
fn eof_inside_a_frame_is_an_error() {
    let mut reader = FrameReader::new(Cursor::new(b"UP\nDOW".to_vec()), 1024);
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("UP"));
    match reader.read_frame() {
        Err(QuicklistError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
        other => panic!("expected unexpected eof, got {:?}", other),
    }
}

#[test]
fn frame_without_terminator_past_bound_fails() {
    let inner = ChunkedReader::new(&[&[b'a'; 10], &[b'b'; 10]]);
    let mut reader = FrameReader::new(inner, 12);
    match reader.read_frame() {
        Err(QuicklistError::FrameTooLarge {
            max_frame_bytes,
            got_bytes,
        }) => {
            assert_eq!(max_frame_bytes, 12);
            assert_eq!(got_bytes, 20);
        }
        other => panic!("expected frame too large, got {:?}", other),
    }
}

#[test]
fn terminated_frame_past_bound_fails() {
    let mut reader = FrameReader::new(Cursor::new(b"0123456789\n".to_vec()), 4);
    assert!(matches!(
        reader.read_frame(),
        Err(QuicklistError::FrameTooLarge { .. })
    ));
}

#[test]
fn frame_exactly_at_bound_is_accepted() {
    let mut reader = FrameReader::new(Cursor::new(b"abcd\n".to_vec()), 4);
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("abcd"));
}

#[test]
fn invalid_utf8_frame_is_consumed() {
    let mut reader = FrameReader::new(Cursor::new(vec![0xff, 0xfe, b'\n', b'U', b'P', b'\n']), 16);
    assert!(matches!(reader.read_frame(), Err(QuicklistError::Utf8(_))));
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("UP"));
}

#[test]
fn forwarding_skips_frames_that_are_not_utf8() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let reader = FrameReader::new(Cursor::new(vec![0xff, b'\n', b'U', b'P', b'\n']), 16);

    reader.forward_to(tx).unwrap();

    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["UP".to_string()]);
}

#[test]
fn forwarding_stops_on_oversized_frame() {
    let (tx, rx) = crossbeam_channel::unbounded();
    let reader = FrameReader::new(Cursor::new(b"UP\nDOWNDOWNDOWN\nQUEUE\n".to_vec()), 8);

    assert!(matches!(
        reader.forward_to(tx),
        Err(QuicklistError::FrameTooLarge { .. })
    ));
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["UP".to_string()]);
}

#[test]
fn writer_terminates_every_frame() {
    let mut writer = FrameWriter::new(Vec::new());
    writer.write_frame("STATUS").unwrap();
    writer.write_frame("{\"Event\":\"GetOwners\",\"ReqID\":2}").unwrap();
    assert_eq!(
        writer.into_inner(),
        b"STATUS\n{\"Event\":\"GetOwners\",\"ReqID\":2}\n".to_vec()
    );
}

#[cfg(unix)]
#[test]
fn shutdown_wakes_a_blocked_reader() {
    let (ours, theirs) = UnixStream::pair().unwrap();
    let connection = Connection::Unix(ours);
    let read_half = connection.try_clone().unwrap();
    let handle = std::thread::spawn(move || FrameReader::new(read_half, 64).read_frame());

    connection.shutdown().unwrap();
    assert_eq!(handle.join().unwrap().unwrap(), None);
    drop(theirs);
}

#[cfg(unix)]
#[test]
fn frames_cross_a_real_socket() {
    let (ours, theirs) = UnixStream::pair().unwrap();
    let mut writer = FrameWriter::new(Connection::Unix(ours));
    let mut reader = FrameReader::new(Connection::Unix(theirs), 64);

    writer.write_frame("UP").unwrap();
    assert_eq!(reader.read_frame().unwrap().as_deref(), Some("UP"));
}

#[test]
fn forward_to_delivers_frames_until_eof() {
    let (tx, rx) = crossbeam_channel::unbounded();
    FrameReader::new(Cursor::new(b"UP\nDOWN\n".to_vec()), 64)
        .forward_to(tx)
        .unwrap();
    assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["UP", "DOWN"]);
}

#[test]
fn forward_to_surfaces_framing_failures() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let result = FrameReader::new(Cursor::new(vec![b'x'; 64]), 8).forward_to(tx);
    assert!(matches!(result, Err(QuicklistError::FrameTooLarge { .. })));
}
