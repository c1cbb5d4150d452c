use dnsdouble::{Config, Shared};
use hyper::{Body, Client, Method, Request, StatusCode};
use std::fs::File;
use std::io::Write;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use trust_dns_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use trust_dns_proto::rr::{Name, RData, RecordType};

struct Double {
    dns_addr: SocketAddr,
    api_addr: SocketAddr,
}

async fn start(hosts_path: &Path) -> Double {
    let config: Shared = Arc::new(Config {
        dns_bind_addr: "127.0.0.1:0".parse().unwrap(),
        api_bind_addr: "127.0.0.1:0".parse().unwrap(),
        dns_timeout: Duration::from_millis(500),
        hosts_path: hosts_path.to_path_buf(),
        ..Config::default()
    });
    let txt_store = dnsdouble::txt_store::new_shared();

    let dns_server = dnsdouble::new_dns(config.clone(), txt_store.clone())
        .await
        .unwrap();
    let dns_addr = dns_server.local_addr().unwrap();
    tokio::spawn(dns_server.block_until_done());

    let api_server = dnsdouble::new_http(config, txt_store).unwrap();
    let api_addr = api_server.local_addr();
    tokio::spawn(api_server);

    Double { dns_addr, api_addr }
}

fn write_hosts(path: &Path, content: &str, modified: SystemTime) {
    let mut f = File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.set_modified(modified).unwrap();
}

async fn publish(api_addr: SocketAddr, body: &str) -> StatusCode {
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("http://{api_addr}/set-txt"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    Client::new().request(request).await.unwrap().status()
}

async fn exchange(stream: &mut TcpStream, questions: &[(&str, RecordType)]) -> Message {
    let mut request = Message::new();
    request
        .set_id(7)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query);
    for (name, record_type) in questions {
        request.add_query(Query::query(Name::from_ascii(name).unwrap(), *record_type));
    }
    let bytes = request.to_vec().unwrap();
    stream.write_u16(bytes.len() as u16).await.unwrap();
    stream.write_all(&bytes).await.unwrap();

    let len = stream.read_u16().await.unwrap();
    let mut buf = vec![0u8; usize::from(len)];
    stream.read_exact(&mut buf).await.unwrap();
    Message::from_vec(&buf).unwrap()
}

async fn query(dns_addr: SocketAddr, questions: &[(&str, RecordType)]) -> Message {
    let mut stream = TcpStream::connect(dns_addr).await.unwrap();
    exchange(&mut stream, questions).await
}

fn txt_values(response: &Message) -> Vec<String> {
    response
        .answers()
        .iter()
        .filter_map(|record| match record.data() {
            Some(RData::TXT(txt)) => Some(
                txt.txt_data()
                    .iter()
                    .map(|data| String::from_utf8_lossy(data).into_owned())
                    .collect(),
            ),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_publish_then_query_txt() {
    let dir = tempfile::tempdir().unwrap();
    let double = start(&dir.path().join("hosts")).await;

    let body = r#"{"host":"_acme-challenge.Example.com","value":"first"}"#;
    assert_eq!(publish(double.api_addr, body).await, StatusCode::OK);
    let body = r#"{"host":"_acme-challenge.example.com.","value":"second"}"#;
    assert_eq!(publish(double.api_addr, body).await, StatusCode::OK);

    let response = query(
        double.dns_addr,
        &[("_acme-challenge.example.com.", RecordType::TXT)],
    )
    .await;
    assert_eq!(response.id(), 7);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(txt_values(&response), vec!["second".to_string()]);
    assert_eq!(response.name_servers().len(), 1);
    assert_eq!(
        response.name_servers()[0].name().to_ascii(),
        "boulder.invalid."
    );

    // Lookups use the query name verbatim.
    let response = query(
        double.dns_addr,
        &[("_acme-challenge.Example.com.", RecordType::TXT)],
    )
    .await;
    assert!(txt_values(&response).is_empty());
}

#[tokio::test]
async fn test_control_api_guards() {
    let dir = tempfile::tempdir().unwrap();
    let double = start(&dir.path().join("hosts")).await;

    assert_eq!(publish(double.api_addr, "{}").await, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("http://{}/set-txt", double.api_addr))
        .body(Body::empty())
        .unwrap();
    let status = Client::new().request(request).await.unwrap().status();
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_hosts_file_changes_are_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let hosts_path = dir.path().join("hosts");
    let modified = SystemTime::now() - Duration::from_secs(120);
    write_hosts(&hosts_path, "1.2.3.4 h\n", modified);
    let double = start(&hosts_path).await;

    let mut stream = TcpStream::connect(double.dns_addr).await.unwrap();
    let response = exchange(&mut stream, &[("h.", RecordType::A)]).await;
    assert_eq!(
        response.answers()[0].data(),
        Some(&RData::A(Ipv4Addr::new(1, 2, 3, 4)))
    );

    write_hosts(&hosts_path, "5.6.7.8 h\n", modified + Duration::from_secs(60));
    // Same connection, several messages.
    let response = exchange(&mut stream, &[("h.", RecordType::A)]).await;
    assert_eq!(
        response.answers()[0].data(),
        Some(&RData::A(Ipv4Addr::new(5, 6, 7, 8)))
    );
}

#[tokio::test]
async fn test_mixed_questions() {
    let dir = tempfile::tempdir().unwrap();
    let hosts_path = dir.path().join("hosts");
    write_hosts(&hosts_path, "10.77.77.77 boulder\n", SystemTime::now());
    let double = start(&hosts_path).await;

    let response = query(
        double.dns_addr,
        &[
            ("unknown.", RecordType::A),
            ("boulder.", RecordType::A),
            ("example.org.", RecordType::MX),
            ("bad-caa-reserved.com.", RecordType::CAA),
        ],
    )
    .await;

    assert_eq!(response.response_code(), ResponseCode::ServFail);
    assert_eq!(response.queries().len(), 4);
    let types: Vec<RecordType> = response
        .answers()
        .iter()
        .map(|record| record.record_type())
        .collect();
    assert_eq!(types, vec![RecordType::A, RecordType::MX, RecordType::CAA]);
    match response.answers()[1].data() {
        Some(RData::MX(mx)) => {
            assert_eq!(mx.preference(), 10);
            assert_eq!(mx.exchange().to_ascii(), "mail.example.org.");
        }
        other => panic!("expected MX, got {other:?}"),
    }
}
