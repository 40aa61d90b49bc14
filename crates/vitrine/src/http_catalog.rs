// File: src/http_catalog.rs
// Purpose: Catalog collaborator over the storefront REST API, read through the response cache

use crate::catalog::{
    Banner, Brand, Catalog, Category, Department, Product, ProductQuery, Slider, Subcategory,
    VideoBanner,
};
use crate::error::CatalogError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use vitrine_cache::ResponseCache;

/// Build a request URL from the API base, a path and query parameters (pure function)
///
/// # Examples
/// ```
/// use vitrine::http_catalog::build_url;
///
/// assert_eq!(build_url("http://api/", "/brands/public", &[]), "http://api/brands/public");
/// assert_eq!(
///     build_url("http://api", "/products", &[("section", "New Arrivals".to_string())]),
///     "http://api/products?section=New%20Arrivals"
/// );
/// ```
pub fn build_url(base_url: &str, path: &str, params: &[(&str, String)]) -> String {
    let mut url = format!("{}{}", base_url.trim_end_matches('/'), path);
    if !params.is_empty() {
        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        url.push('?');
        url.push_str(&query.join("&"));
    }
    url
}

/// Map a non-success status to a catalog error (pure function)
pub fn classify_status(status: u16, url: &str) -> CatalogError {
    match status {
        404 => CatalogError::NotFound(url.to_string()),
        401 | 403 => CatalogError::Unauthorized(url.to_string()),
        _ => CatalogError::Status {
            status,
            url: url.to_string(),
        },
    }
}

/// Strip the `{ "success": .., "data": .. }` envelope some endpoints wrap results in
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or_default(),
        other => other,
    }
}

/// REST catalog client. Every GET goes through the injected response cache.
#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    cache: ResponseCache,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, cache: ResponseCache) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            cache,
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = build_url(&self.base_url, path, params);
        let value = self
            .cache
            .get_or_fetch(&url, &[], || self.fetch_value(&url))
            .await?;

        serde_json::from_value(unwrap_envelope(value))
            .map_err(|e| CatalogError::Decode(format!("{}: {}", url, e)))
    }

    async fn fetch_value(&self, url: &str) -> Result<Value, CatalogError> {
        debug!(url, "catalog fetch");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status.as_u16(), url));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn sliders(&self) -> Result<Vec<Slider>, CatalogError> {
        self.get_json("/sliders", &[]).await
    }

    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.get_json("/categories", &[]).await
    }

    async fn departments(&self) -> Result<Vec<Department>, CatalogError> {
        self.get_json("/departments", &[]).await
    }

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        self.get_json("/products", &query.params()).await
    }

    async fn subcategories(&self) -> Result<Vec<Subcategory>, CatalogError> {
        self.get_json("/subcategories", &[]).await
    }

    async fn banners(&self) -> Result<Vec<Banner>, CatalogError> {
        self.get_json("/banners", &[]).await
    }

    async fn banner(&self, id: &str) -> Result<Banner, CatalogError> {
        let path = format!("/banners/detail/{}", urlencoding::encode(id));
        self.get_json(&path, &[]).await
    }

    async fn video_banners(&self) -> Result<Vec<VideoBanner>, CatalogError> {
        self.get_json("/video-banners/public", &[]).await
    }

    async fn brands(&self) -> Result<Vec<Brand>, CatalogError> {
        self.get_json("/brands/public", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_build_url_encodes_params() {
        let url = build_url(
            "http://localhost:5000/api",
            "/products",
            &[("categoryId", "a&b".to_string()), ("limit", "8".to_string())],
        );
        assert_eq!(url, "http://localhost:5000/api/products?categoryId=a%26b&limit=8");
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(404, "/x"), CatalogError::NotFound("/x".into()));
        assert_eq!(classify_status(401, "/x"), CatalogError::Unauthorized("/x".into()));
        assert_eq!(classify_status(403, "/x"), CatalogError::Unauthorized("/x".into()));
        assert_eq!(
            classify_status(500, "/x"),
            CatalogError::Status { status: 500, url: "/x".into() }
        );
    }

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(unwrap_envelope(json!({"success": true, "data": [1, 2]})), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!({"id": "x"})), json!({"id": "x"}));
    }
}
