//! Shared utilities

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use fake::{
    faker::{
        lorem::en::{Sentence, Word},
        name::en::Name,
    },
    Fake,
};
use hyper::{
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use serde_json::{json, Value};

/// Request handler of the fake API
pub type Handler = fn(&Request<Body>) -> Response<Body>;

/// In-process stand-in for the article API
pub struct FakeApi {
    /// Base URL, including the `/api/v1` prefix
    pub url: String,
    /// Received requests, as `METHOD /path?query`
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    /// Starts the server on an ephemeral port
    pub async fn start(handler: Handler) -> Self {
        let requests = Arc::new(Mutex::new(vec![]));
        let log = requests.clone();

        let service = make_service_fn(move |_conn| {
            let log = log.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                    let log = log.clone();
                    async move {
                        log.lock()
                            .unwrap()
                            .push(format!("{} {}", req.method(), req.uri()));
                        Ok::<_, Infallible>(handler(&req))
                    }
                }))
            }
        });

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let server = Server::bind(&addr).serve(service);
        let addr = server.local_addr();
        tokio::spawn(server);

        Self {
            url: format!("http://{addr}/api/v1"),
            requests,
        }
    }

    /// Returns the received requests
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Builds a JSON response
pub fn json(status: StatusCode, body: Value) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a fake article record
pub fn article(id: i64) -> Value {
    let title: String = Sentence(3..8).fake();
    let description: String = Sentence(8..16).fake();
    let author: String = Name().fake();
    let source: String = Word().fake();
    json!({
        "id": id,
        "title": title,
        "description": description,
        "author": author,
        "category": "Technology",
        "source": source,
        "url": format!("https://news.example.com/{id}"),
        "published_at": "2024-01-05T10:00:00+00:00",
        "read_time_minutes": 4
    })
}
