use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use bookpane::Error;
use bookpane::chapter::parse;
use bookpane::favorites::MemoryStore;
use bookpane::library::{HttpSource, load_book};
use bookpane::session::Session;

struct StubServer {
    base_url: String,
    shutdown: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<Vec<String>>>,
}

impl StubServer {
    fn start() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base_url = format!("http://{}/books", server.server_addr());
        let (shutdown, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };
                let url = request.url().to_string();
                seen.push(url.clone());

                let (status, body) = match url.as_str() {
                    "/books/good/info.json" => (200, r#"{"title":"Remote"}"#),
                    "/books/good/book.txt" => (200, "## One\nremote text\n## Two\nmore"),
                    "/books/nocontent/info.json" => (200, "{}"),
                    _ => (404, "not found"),
                };
                let _ = request
                    .respond(tiny_http::Response::from_string(body).with_status_code(status));
            }
            seen
        });

        Self {
            base_url,
            shutdown,
            handle: Some(handle),
        }
    }

    fn stop(mut self) -> Vec<String> {
        let _ = self.shutdown.send(());
        self.handle
            .take()
            .expect("server thread")
            .join()
            .expect("join server thread")
    }
}

#[test]
fn loads_metadata_then_content_over_http() {
    let server = StubServer::start();
    let source = HttpSource::new(&server.base_url).unwrap();

    let book = load_book(&source, "good").unwrap();
    assert_eq!(book.info.display_title(), "Remote");
    let parsed = parse(&book.text);
    assert_eq!(parsed.chapters.len(), 2);

    assert_eq!(
        server.stop(),
        vec!["/books/good/info.json", "/books/good/book.txt"]
    );
}

#[test]
fn missing_metadata_skips_content_request() {
    let server = StubServer::start();
    let source = HttpSource::new(&server.base_url).unwrap();

    let err = load_book(&source, "absent").unwrap_err();
    assert!(matches!(err, Error::Status { status: 404, .. }), "{err}");
    assert_eq!(server.stop(), vec!["/books/absent/info.json"]);
}

#[test]
fn content_failure_surfaces_as_load_error() {
    let server = StubServer::start();
    let source = HttpSource::new(&format!("{}/", server.base_url)).unwrap();

    let mut session = Session::default();
    session.load(&source, &MemoryStore::default(), "nocontent");
    let message = session.load_error.clone().unwrap();
    assert!(message.starts_with("Failed to load book:"), "{message}");
    assert!(message.contains("404"), "{message}");
    assert!(session.parsed.blocks.is_empty());

    server.stop();
}
