use anyhow::{Error, anyhow, ensure};
use cucumber::gherkin::Step;
use cucumber::then;
use serde_json::Value;

use crate::core::{MeteoWorld, StepExt, TEST_API_KEY};

#[then(expr = "response status is {int}")]
fn response_status(world: &mut MeteoWorld, status: u16) -> Result<(), Error> {
    let actual = world.response()?.status_code().as_u16();
    ensure!(
        actual == status,
        "Response status {actual} does not match expected {status}"
    );
    Ok(())
}

#[then("response body is empty")]
fn response_body_empty(world: &mut MeteoWorld) -> Result<(), Error> {
    let body = world.response()?.text();
    ensure!(body.is_empty(), "expected empty body, got {body:?}");
    Ok(())
}

#[then(expr = "response body is {string}")]
fn response_body_text(world: &mut MeteoWorld, expected: String) -> Result<(), Error> {
    let body = world.response()?.text();
    ensure!(body == expected, "expected body {expected:?}, got {body:?}");
    Ok(())
}

#[then("response json is:")]
fn response_json(world: &mut MeteoWorld, step: &Step) -> Result<(), Error> {
    let expected = step
        .docstring_content()
        .ok_or_else(|| anyhow!("expected json not provided"))?;
    let expected: Value = serde_json::from_str(&expected)?;
    let body = world.response()?.text();
    let actual: Value = serde_json::from_str(&body)
        .map_err(|e| anyhow!("Failed to parse response body as JSON: {e}: {body:?}"))?;
    pretty_assertions::assert_eq!(actual, expected);
    Ok(())
}

#[then(expr = "response header {string} is {string}")]
fn response_header(world: &mut MeteoWorld, name: String, expected: String) -> Result<(), Error> {
    let response = world.response()?;
    let value = response
        .headers()
        .get(name.as_str())
        .ok_or_else(|| anyhow!("header {name} missing"))?
        .to_str()?;
    ensure!(value == expected, "header {name} is {value:?}, expected {expected:?}");
    Ok(())
}

#[then(expr = "the provider received {int} request(s)")]
async fn provider_request_count(world: &mut MeteoWorld, expected: usize) -> Result<(), Error> {
    let received = world
        .mock()
        .await?
        .received_requests()
        .await
        .ok_or_else(|| anyhow!("request recording is disabled"))?;
    ensure!(
        received.len() == expected,
        "provider received {} requests, expected {expected}",
        received.len()
    );
    Ok(())
}

#[then(expr = "the provider was asked for {string}")]
async fn provider_asked_for(world: &mut MeteoWorld, city: String) -> Result<(), Error> {
    let received = world
        .mock()
        .await?
        .received_requests()
        .await
        .ok_or_else(|| anyhow!("request recording is disabled"))?;
    let request = received
        .last()
        .ok_or_else(|| anyhow!("provider received no requests"))?;

    let param = |name: &str| {
        request
            .url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };
    ensure!(param("q").as_deref() == Some(city.as_str()), "q was {:?}", param("q"));
    ensure!(
        param("appid").as_deref() == Some(TEST_API_KEY),
        "appid was {:?}",
        param("appid")
    );
    ensure!(
        param("units").as_deref() == Some("metric"),
        "units was {:?}",
        param("units")
    );
    Ok(())
}
