// File: src/memory_catalog.rs
// Purpose: Fixture-backed catalog for local runs and tests

use crate::catalog::{
    Banner, Brand, Catalog, Category, Department, Product, ProductQuery, Slider, Subcategory,
    VideoBanner,
};
use crate::error::CatalogError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Catalog contents as stored in a fixture JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogFixture {
    pub sliders: Vec<Slider>,
    pub categories: Vec<Category>,
    pub departments: Vec<Department>,
    pub products: Vec<Product>,
    pub subcategories: Vec<Subcategory>,
    pub banners: Vec<Banner>,
    pub video_banners: Vec<VideoBanner>,
    pub brands: Vec<Brand>,
}

/// In-memory catalog. Product queries are answered by applying the query to
/// the fixture, the way the products endpoint filters server-side.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    data: Arc<CatalogFixture>,
    requests: Arc<AtomicUsize>,
}

impl MemoryCatalog {
    pub fn new(data: CatalogFixture) -> Self {
        Self {
            data: Arc::new(data),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Load a fixture from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog fixture: {:?}", path))?;
        let data: CatalogFixture = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog fixture: {:?}", path))?;
        Ok(Self::new(data))
    }

    /// Number of requests served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn served<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        items.to_vec()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn sliders(&self) -> Result<Vec<Slider>, CatalogError> {
        Ok(self.served(&self.data.sliders))
    }

    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.served(&self.data.categories))
    }

    async fn departments(&self) -> Result<Vec<Department>, CatalogError> {
        Ok(self.served(&self.data.departments))
    }

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let matching: Vec<Product> = self
            .served(&self.data.products)
            .into_iter()
            .filter(|p| query.accepts(p))
            .collect();

        Ok(match query.limit {
            Some(limit) => matching.into_iter().take(limit).collect(),
            None => matching,
        })
    }

    async fn subcategories(&self) -> Result<Vec<Subcategory>, CatalogError> {
        Ok(self.served(&self.data.subcategories))
    }

    async fn banners(&self) -> Result<Vec<Banner>, CatalogError> {
        Ok(self.served(&self.data.banners))
    }

    async fn banner(&self, id: &str) -> Result<Banner, CatalogError> {
        self.served(&self.data.banners)
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("/banners/detail/{}", id)))
    }

    async fn video_banners(&self) -> Result<Vec<VideoBanner>, CatalogError> {
        Ok(self.served(&self.data.video_banners))
    }

    async fn brands(&self) -> Result<Vec<Brand>, CatalogError> {
        Ok(self.served(&self.data.brands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductFilter;

    fn product(id: &str, sections: &[&str], trending: bool) -> Product {
        Product {
            id: id.into(),
            name: id.into(),
            slug: None,
            price: 10.0,
            sale_price: None,
            image_url: None,
            brand: None,
            sections: sections.iter().map(|s| s.to_string()).collect(),
            category_id: None,
            is_featured: false,
            is_new_arrival: false,
            is_trending: trending,
            discount: None,
            collection: None,
        }
    }

    #[tokio::test]
    async fn test_products_apply_query_and_limit() {
        let catalog = MemoryCatalog::new(CatalogFixture {
            products: vec![
                product("a", &["Sale"], true),
                product("b", &["Sale"], false),
                product("c", &[], true),
            ],
            ..Default::default()
        });

        let trending = ProductQuery {
            filter: Some(ProductFilter::Trending),
            limit: Some(1),
            ..Default::default()
        };
        let result = catalog.products(&trending).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "a");

        let sale = ProductQuery {
            section: Some("sale".into()),
            ..Default::default()
        };
        assert_eq!(catalog.products(&sale).await.unwrap().len(), 2);
        assert_eq!(catalog.request_count(), 2);
    }

    #[tokio::test]
    async fn test_banner_detail_not_found() {
        let catalog = MemoryCatalog::default();
        let err = catalog.banner("nope").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_fixture_parses_partial_json() {
        let fixture: CatalogFixture = serde_json::from_value(serde_json::json!({
            "brands": [{"_id": "b1", "name": "Avène"}]
        }))
        .unwrap();
        assert_eq!(fixture.brands.len(), 1);
        assert!(fixture.brands[0].is_active);
        assert!(fixture.products.is_empty());
    }
}
