//! API client for TheCocktailDB JSON API.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::models::Cocktail;

// ============================================================================
// Constants
// ============================================================================

/// Public v1 endpoint (test key "1")
pub const DEFAULT_BASE_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum concurrent requests when fanning out random lookups.
const MAX_CONCURRENT_REQUESTS: usize = 10;

/// Number of random cocktails the home screen shows.
pub const DEFAULT_RANDOM_COUNT: usize = 10;

/// Most random cocktails one `fetch_random` call will request.
pub const MAX_RANDOM_COUNT: usize = 100;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct DrinksResponse<T> {
    // The API sends `"drinks": null` (or sometimes `"drinks": "no data found"`)
    // when nothing matches
    #[serde(default, deserialize_with = "lenient_list")]
    drinks: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IngredientListResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    drinks: Vec<IngredientEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    ingredients: Vec<IngredientEntry>,
}

#[derive(Debug, Deserialize)]
struct IngredientEntry {
    #[serde(rename = "strIngredient1", alias = "strIngredient")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    #[serde(rename = "strCategory")]
    name: String,
}

/// Accept a list, or treat `null` / any non-list value as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(Vec::new()),
    }
}

/// API client for TheCocktailDB.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the public endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client for a different deployment (or a local mock)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: reqwest::Response) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(endpoint);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(&url)
                .query(query)
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let text = response
                        .text()
                        .await
                        .with_context(|| format!("Failed to read response from {}", url))?;
                    // An empty body is how the API answers some unknown lookups
                    let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
                    return serde_json::from_str(text)
                        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    async fn get_drinks(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<Cocktail>> {
        let response: DrinksResponse<Cocktail> = self.get(endpoint, query).await?;
        debug!(endpoint = endpoint, count = response.drinks.len(), "Fetched drinks");
        Ok(response.drinks)
    }

    // ===== Drink lookups =====

    /// Search cocktails by (partial) name
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<Cocktail>> {
        self.get_drinks("search.php", &[("s", query)]).await
    }

    /// Cocktails containing an ingredient, optionally capped at `limit`.
    /// Results are summaries (id, name, thumbnail).
    pub async fn filter_by_ingredient(&self, ingredient: &str, limit: Option<usize>) -> Result<Vec<Cocktail>> {
        let mut drinks = self.get_drinks("filter.php", &[("i", ingredient)]).await?;
        if let Some(limit) = limit {
            drinks.truncate(limit);
        }
        Ok(drinks)
    }

    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<Cocktail>> {
        self.get_drinks("filter.php", &[("c", category)]).await
    }

    /// Filter by alcohol type ("Alcoholic", "Non_Alcoholic", "Optional_alcohol")
    pub async fn filter_by_alcohol(&self, alcohol: &str) -> Result<Vec<Cocktail>> {
        self.get_drinks("filter.php", &[("a", alcohol)]).await
    }

    /// Full recipe for one cocktail, `None` if the id is unknown
    pub async fn lookup_by_id(&self, id: &str) -> Result<Option<Cocktail>> {
        let drinks = self.get_drinks("lookup.php", &[("i", id)]).await?;
        Ok(drinks.into_iter().next())
    }

    async fn fetch_one_random(&self) -> Result<Option<Cocktail>> {
        let drinks = self.get_drinks("random.php", &[]).await?;
        Ok(drinks.into_iter().next())
    }

    /// `count` random cocktails. The API returns one per call, so this fans
    /// out `count` requests; any failed request fails the whole batch.
    /// Counts above `MAX_RANDOM_COUNT` are capped.
    pub async fn fetch_random(&self, count: usize) -> Result<Vec<Cocktail>> {
        if count > MAX_RANDOM_COUNT {
            warn!(requested = count, max = MAX_RANDOM_COUNT, "Capping random count");
        }
        let count = count.min(MAX_RANDOM_COUNT);
        let results: Vec<Result<Option<Cocktail>>> = stream::iter(0..count)
            .map(|_| self.fetch_one_random())
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .collect()
            .await;

        let mut cocktails = Vec::with_capacity(count);
        for result in results {
            if let Some(cocktail) = result? {
                cocktails.push(cocktail);
            }
        }
        Ok(cocktails)
    }

    /// Popular cocktails (premium endpoint on the public key)
    pub async fn fetch_popular(&self) -> Result<Vec<Cocktail>> {
        self.get_drinks("popular.php", &[]).await
    }

    // ===== Lists =====

    pub async fn list_ingredients(&self) -> Result<Vec<String>> {
        let response: IngredientListResponse = self.get("list.php", &[("i", "list")]).await?;
        Ok(response
            .drinks
            .into_iter()
            .chain(response.ingredients)
            .map(|i| i.name)
            .collect())
    }

    pub async fn list_categories(&self) -> Result<Vec<String>> {
        let response: DrinksResponse<CategoryEntry> = self.get("list.php", &[("c", "list")]).await?;
        Ok(response.drinks.into_iter().map(|c| c.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::with_base_url("http://localhost:8080/api/").expect("client");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("search.php"), "http://localhost:8080/api/search.php");
    }

    #[test]
    fn test_parse_null_drinks() {
        let resp: DrinksResponse<Cocktail> =
            serde_json::from_str(r#"{"drinks": null}"#).expect("Failed to parse null drinks");
        assert!(resp.drinks.is_empty());

        let resp: DrinksResponse<Cocktail> =
            serde_json::from_str(r#"{"drinks": "no data found"}"#).expect("Failed to parse text drinks");
        assert!(resp.drinks.is_empty());

        let resp: DrinksResponse<Cocktail> = serde_json::from_str("{}").expect("Failed to parse empty");
        assert!(resp.drinks.is_empty());
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"drinks":[{"idDrink":"11007","strDrink":"Margarita","strCategory":"Ordinary Drink","strAlcoholic":"Alcoholic","strIngredient1":"Tequila","strMeasure1":"1 1/2 oz "}]}"#;
        let resp: DrinksResponse<Cocktail> = serde_json::from_str(json).expect("Failed to parse search");
        assert_eq!(resp.drinks.len(), 1);
        assert_eq!(resp.drinks[0].name, "Margarita");
        assert_eq!(resp.drinks[0].ingredients()[0].display(), "1 1/2 oz Tequila");
    }

    #[test]
    fn test_parse_ingredient_lists() {
        let json = r#"{"drinks":[{"strIngredient1":"Light rum"},{"strIngredient1":"Applejack"}]}"#;
        let resp: IngredientListResponse = serde_json::from_str(json).expect("Failed to parse drinks list");
        assert_eq!(resp.drinks.len(), 2);
        assert_eq!(resp.drinks[1].name, "Applejack");

        let json = r#"{"ingredients":[{"strIngredient":"Gin"}]}"#;
        let resp: IngredientListResponse = serde_json::from_str(json).expect("Failed to parse ingredients list");
        assert_eq!(resp.ingredients[0].name, "Gin");
        assert!(resp.drinks.is_empty());
    }

    #[test]
    fn test_parse_category_list() {
        let json = r#"{"drinks":[{"strCategory":"Cocktail"},{"strCategory":"Shot"}]}"#;
        let resp: DrinksResponse<CategoryEntry> = serde_json::from_str(json).expect("Failed to parse categories");
        let names: Vec<String> = resp.drinks.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Cocktail", "Shot"]);
    }
}
