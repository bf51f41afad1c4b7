#![allow(dead_code)]

use std::io::Read;
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

pub fn panic_after<T, F>(duration: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (done_tx, done_rx) = mpsc::channel();
    let handle = std::thread::spawn(move || {
        let value = f();
        let _ = done_tx.send(());
        value
    });

    match done_rx.recv_timeout(duration) {
        Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => match handle.join() {
            Ok(value) => value,
            Err(panic) => std::panic::resume_unwind(panic),
        },
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("test took longer than {duration:?}"),
    }
}

/// Binds an ephemeral port on 127.0.0.1 and hands the first accepted
/// connection to `peer` on a separate thread.
pub fn spawn_peer<F>(peer: F) -> (u16, JoinHandle<()>)
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock peer");
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept probe connection");
        peer(stream);
    });

    (port, handle)
}

/// Reads one request: the head up to the blank line, then `Content-Length`
/// bytes of body. Returns (head, body).
pub fn read_request(stream: &mut TcpStream) -> (Vec<u8>, Vec<u8>) {
    let mut head: Vec<u8> = vec![];
    let mut byte = [0u8; 1];

    while !head.ends_with(b"\r\n\r\n") {
        let n = stream.read(&mut byte).unwrap();
        assert_eq!(n, 1, "peer hung up before the header block ended");
        head.push(byte[0]);
    }

    let content_length = std::str::from_utf8(&head)
        .unwrap()
        .split("\r\n")
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .map(|value| value.parse::<usize>().unwrap())
        .unwrap_or(0);

    let mut body = vec![0u8; content_length];
    stream.read_exact(&mut body).unwrap();

    (head, body)
}

/// A listener that is never served. Connections the kernel completes on it
/// stay in the backlog, so `assert_never_dialed` can see them.
pub fn idle_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind idle listener");
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port();

    (listener, port)
}

pub fn assert_never_dialed(listener: &TcpListener) {
    match listener.accept() {
        Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {}
        Err(err) => panic!("unexpected accept error: {err}"),
        Ok((_, addr)) => panic!("a connection from {addr} reached the listener"),
    }
}
