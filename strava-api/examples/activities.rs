use strava_api::{Client, Request, StravaApiError};

#[tokio::main]
pub async fn main() -> Result<(), StravaApiError> {
    let client = Client::new("access_token");

    let req = Request::activities().list().per_page(3u32);

    let activities = client.send(req).await?;
    for activity in activities {
        let name = activity.name.as_deref().unwrap_or("Untitled");
        println!("{} ({:.0} m)", name, activity.distance);
    }
    Ok(())
}
