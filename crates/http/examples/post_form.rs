use http::Request;
use micro_http_client::Client;
use micro_http_client::protocol::RequestBody;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let body = RequestBody::form(&[("name", "caihuiting")]).expect("form body");
    let request = Request::post("http://127.0.0.1:8088/")
        .header("X-Foo2", "customed")
        .body(body)
        .expect("valid request");

    match Client::new().send(request).await {
        Ok(response) => {
            info!(status = response.status_code, reason = %response.status_text, "got response");
            for (name, value) in &response.headers {
                println!("{name}: {value}");
            }
            println!();
            println!("{}", response.body);
        }
        Err(e) => {
            error!(cause = %e, "request failed");
        }
    }
}
