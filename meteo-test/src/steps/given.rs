use std::net::TcpListener;
use std::time::Duration;

use anyhow::{Error, anyhow};
use cucumber::gherkin::Step;
use cucumber::given;
use meteo_reqwest::WEATHER_PATH;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::core::{MeteoWorld, Provider, StepExt};

async fn mount(world: &mut MeteoWorld, template: ResponseTemplate) -> Result<(), Error> {
    let server = world.mock().await?;
    Mock::given(method("GET"))
        .and(path(format!("/{WEATHER_PATH}")))
        .respond_with(template)
        .mount(server)
        .await;
    Ok(())
}

#[given(expr = "the provider responds with status {int} and body:")]
async fn provider_responds_with(
    world: &mut MeteoWorld,
    status: u16,
    step: &Step,
) -> Result<(), Error> {
    let body = step
        .docstring_content()
        .ok_or_else(|| anyhow!("provider body not provided"))?;
    mount(world, ResponseTemplate::new(status).set_body_string(body)).await
}

#[given(expr = "the provider responds with status {int} and an empty body")]
async fn provider_responds_empty(world: &mut MeteoWorld, status: u16) -> Result<(), Error> {
    mount(world, ResponseTemplate::new(status)).await
}

#[given(expr = "the provider responds with status {int} and a body that is not UTF-8")]
async fn provider_responds_non_utf8(world: &mut MeteoWorld, status: u16) -> Result<(), Error> {
    let mut body = br#"{"main":{"temp":1.0},"weather":[{"description":""#.to_vec();
    body.extend_from_slice(&[0xff, 0xfe]);
    body.extend_from_slice(br#""}],"cod":200}"#);
    mount(world, ResponseTemplate::new(status).set_body_bytes(body)).await
}

#[given(expr = "the provider responds after {int} ms with body:")]
async fn provider_responds_slowly(
    world: &mut MeteoWorld,
    delay_ms: u64,
    step: &Step,
) -> Result<(), Error> {
    let body = step
        .docstring_content()
        .ok_or_else(|| anyhow!("provider body not provided"))?;
    let template = ResponseTemplate::new(200)
        .set_body_string(body)
        .set_delay(Duration::from_millis(delay_ms));
    mount(world, template).await
}

#[given("the provider is unreachable")]
fn provider_unreachable(world: &mut MeteoWorld) -> Result<(), Error> {
    // Bind then drop so the port is known to be closed.
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    world.provider = Provider::Unreachable(format!("http://{addr}"));
    Ok(())
}

#[given(expr = "the upstream timeout is {int} ms")]
fn upstream_timeout(world: &mut MeteoWorld, timeout_ms: u64) {
    world.timeout = Duration::from_millis(timeout_ms);
}
