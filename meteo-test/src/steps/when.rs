use anyhow::Error;
use cucumber::when;

use crate::core::MeteoWorld;

#[when(expr = "I request {string}")]
async fn request(world: &mut MeteoWorld, path: String) -> Result<(), Error> {
    world.execute_request(&path, None).await
}

#[when(expr = "I request {string} from origin {string}")]
async fn request_from_origin(
    world: &mut MeteoWorld,
    path: String,
    origin: String,
) -> Result<(), Error> {
    world.execute_request(&path, Some(&origin)).await
}

#[when(expr = "I request {string} {int} times")]
async fn request_repeatedly(
    world: &mut MeteoWorld,
    path: String,
    times: usize,
) -> Result<(), Error> {
    let mut previous: Option<(u16, String)> = None;
    for _ in 0..times {
        world.execute_request(&path, None).await?;
        let response = world.response()?;
        let current = (response.status_code().as_u16(), response.text());
        if let Some(previous) = &previous {
            anyhow::ensure!(
                previous == &current,
                "response changed between identical requests: {previous:?} then {current:?}"
            );
        }
        previous = Some(current);
    }
    Ok(())
}
