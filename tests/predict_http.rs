use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, OnceLock};
use std::thread;

use rand::{rngs::StdRng, SeedableRng};
use serde_json::Value;

use threat_nn::{server, ModelConfig, Predictor, ServerConfig};

/// One server per test binary, bound to an ephemeral loopback port.
fn server_addr() -> SocketAddr {
    static ADDR: OnceLock<SocketAddr> = OnceLock::new();
    *ADDR.get_or_init(|| {
        let mut rng = StdRng::seed_from_u64(5000);
        let predictor = Predictor::bootstrap_with_rng(&ModelConfig::default(), &mut rng)
            .expect("bootstrap");
        let config = ServerConfig { host: "127.0.0.1".to_owned(), port: 0 };
        let listener = server::bind(&config).expect("bind");
        let addr = listener.server_addr().to_ip().expect("tcp listener");
        thread::spawn(move || server::serve(listener, Arc::new(predictor)));
        addr
    })
}

/// Sends a raw HTTP/1.1 request and returns (status, parsed JSON body).
fn send(method: &str, path: &str, content_type: Option<&str>, body: &str) -> (u16, Value) {
    let mut stream = TcpStream::connect(server_addr()).expect("connect");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    if let Some(ct) = content_type {
        req.push_str(&format!("Content-Type: {ct}\r\n"));
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
    stream.write_all(req.as_bytes()).expect("write");

    let mut reader = BufReader::new(stream);
    let mut status_line = String::new();
    reader.read_line(&mut status_line).expect("status line");
    let status: u16 = status_line.split_whitespace().nth(1).expect("status").parse().expect("code");

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("header");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().expect("length");
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).expect("body");
    (status, serde_json::from_slice(&body).expect("json body"))
}

fn post_json(body: &str) -> (u16, Value) {
    send("POST", "/predict", Some("application/json"), body)
}

#[test]
fn well_formed_request_returns_probability() {
    let (status, body) = post_json(r#"{"input":[0.1,0.2,0.3,0.4,0.5,0.6,0.7,0.8,0.9,1.0]}"#);
    assert_eq!(status, 200);
    let p = body["prediction"].as_f64().expect("prediction is a number");
    assert!((0.0..=1.0).contains(&p));
}

#[test]
fn identical_requests_get_identical_answers() {
    let req = r#"{"input":[1,0,1,0,1,0,1,0,1,0]}"#;
    let first = post_json(req);
    let second = post_json(req);
    assert_eq!(first.0, 200);
    assert_eq!(first, second);
}

#[test]
fn missing_input_is_a_client_error() {
    let (status, body) = post_json("{}");
    assert_eq!(status, 400);
    assert!(!body["error"].as_str().expect("error string").is_empty());
}

#[test]
fn wrong_length_is_a_client_error() {
    for input in ["[1,2,3]", "[0,0,0,0,0,0,0,0,0,0,0]"] {
        let (status, body) = post_json(&format!(r#"{{"input":{input}}}"#));
        assert_eq!(status, 400, "input {input}");
        assert!(body["error"].is_string());
    }
}

#[test]
fn malformed_json_is_a_client_error() {
    let (status, body) = post_json(r#"{"input": [0.1, 0.2"#);
    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}

#[test]
fn non_json_content_type_is_a_client_error() {
    let (status, _) = send("POST", "/predict", Some("text/plain"), r#"{"input":[0,0,0,0,0,0,0,0,0,0]}"#);
    assert_eq!(status, 400);
}

#[test]
fn unknown_route_and_wrong_method() {
    assert_eq!(send("GET", "/nope", None, "").0, 404);
    let (status, body) = send("GET", "/predict", None, "");
    assert_eq!(status, 405);
    assert_eq!(body["error"], "method not allowed");
}

#[test]
fn huge_values_never_answer_with_null() {
    let bodies = [
        r#"{"input":[1e308,1e308,1e308,1e308,1e308,1e308,1e308,1e308,1e308,1e308]}"#,
        r#"{"input":[1e308,-1e308,1e308,-1e308,1e308,-1e308,1e308,-1e308,1e308,-1e308]}"#,
    ];
    for req in bodies {
        let (status, body) = post_json(req);
        match status {
            200 => {
                let p = body["prediction"].as_f64().expect("prediction is a number");
                assert!((0.0..=1.0).contains(&p));
            }
            400 => assert!(body["error"].is_string()),
            other => panic!("unexpected status {other} for {req}"),
        }
    }
}

#[test]
fn nested_and_boolean_inputs_are_scored() {
    let bodies = [
        r#"{"input":[[0.1,0.2,0.3,0.4,0.5,0.6,0.7,0.8,0.9,1.0]]}"#,
        r#"{"input":[[0.1,0.2,0.3,0.4,0.5],[0.6,0.7,0.8,0.9,1.0]]}"#,
        r#"{"input":[true,false,true,false,true,false,true,false,true,false]}"#,
    ];
    for req in bodies {
        let (status, body) = post_json(req);
        assert_eq!(status, 200, "{req}");
        let p = body["prediction"].as_f64().expect("prediction is a number");
        assert!((0.0..=1.0).contains(&p));
    }
}

#[test]
fn ragged_or_textual_inputs_are_client_errors() {
    for req in [
        r#"{"input":[[1,2,3,4,5],[6,7,8,9]]}"#,
        r#"{"input":["a","b","c","d","e","f","g","h","i","j"]}"#,
        r#"{"input":[{"x":1},2,3,4,5,6,7,8,9,10]}"#,
    ] {
        let (status, body) = post_json(req);
        assert_eq!(status, 400, "{req}");
        assert!(body["error"].is_string());
    }
}
