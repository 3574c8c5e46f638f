//! Breed image lookup against public pet image APIs.
//!
//! - Dogs: Dog CEO (`https://dog.ceo/api/breed/<breed>/images/random`)
//! - Cats: TheCatAPI (`https://api.thecatapi.com/v1/images/search?breed_ids=<breed>`)
//!
//! Other pet types have no image source. Lookup failures are logged and
//! treated as "no image"; they never fail the request.

use serde::Deserialize;

/// Returned when a breed has no stored image and none could be found.
pub const DEFAULT_IMAGE: &str = "default-breed.jpg";

const DOG_CEO_API: &str = "https://dog.ceo/api";
const CAT_API: &str = "https://api.thecatapi.com/v1/images/search";

#[derive(Debug, Deserialize)]
struct DogCeoResponse {
    message: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct CatImage {
    url: String,
}

/// Find an image URL for a breed of the given pet type.
pub async fn lookup(client: &reqwest::Client, pet_type: &str, breed_name: &str) -> Option<String> {
    let breed = breed_name.trim().to_lowercase();

    let result = match pet_type.trim().to_lowercase().as_str() {
        "dog" => fetch_dog_image(client, &breed).await,
        "cat" => fetch_cat_image(client, &breed).await,
        _ => return None,
    };

    match result {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Image lookup for {} {} failed: {}", pet_type, breed_name, e);
            None
        }
    }
}

fn dog_image_url(breed: &str) -> String {
    format!("{}/breed/{}/images/random", DOG_CEO_API, breed)
}

async fn fetch_dog_image(
    client: &reqwest::Client,
    breed: &str,
) -> Result<Option<String>, reqwest::Error> {
    let response = client.get(dog_image_url(breed)).send().await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let body: DogCeoResponse = response.json().await?;
    Ok((body.status == "success").then_some(body.message))
}

async fn fetch_cat_image(
    client: &reqwest::Client,
    breed: &str,
) -> Result<Option<String>, reqwest::Error> {
    let response = client
        .get(CAT_API)
        .query(&[("breed_ids", breed)])
        .send()
        .await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let images: Vec<CatImage> = response.json().await?;
    Ok(images.into_iter().next().map(|image| image.url))
}
