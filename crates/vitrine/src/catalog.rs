// File: src/catalog.rs
// Purpose: Read-only catalog collaborators consumed by the section resolver

use crate::error::CatalogError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// CATALOG ENTITIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slider {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub mobile_image_url: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    /// Homepage section tags (e.g. "New Arrivals", "Best Sellers")
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(default)]
    pub is_trending: bool,
    #[serde(default)]
    pub discount: Option<u32>,
    #[serde(default)]
    pub collection: Option<String>,
}

impl Product {
    /// Whether the product carries the homepage section tag (case-insensitive)
    pub fn has_section(&self, section: &str) -> bool {
        let wanted = section.trim();
        self.sections.iter().any(|s| s.trim().eq_ignore_ascii_case(wanted))
    }

    /// Price to show, the sale price when it is lower
    pub fn display_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub mobile_image_url: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Placement directive, `location` on newer records
    #[serde(default, alias = "location")]
    pub position: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoBanner {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub video_url: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// PRODUCT QUERIES
// ============================================================================

/// Legacy boolean product filters, sent as `filter=` on the products endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductFilter {
    Featured,
    NewArrival,
    Trending,
}

impl ProductFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductFilter::Featured => "featured",
            ProductFilter::NewArrival => "new-arrival",
            ProductFilter::Trending => "trending",
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::Featured => product.is_featured,
            ProductFilter::NewArrival => product.is_new_arrival,
            ProductFilter::Trending => product.is_trending,
        }
    }
}

/// A product listing request against the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductQuery {
    pub category_id: Option<String>,
    /// Homepage section tag; authoritative over `filter`
    pub section: Option<String>,
    pub filter: Option<ProductFilter>,
    pub limit: Option<usize>,
    pub min_discount: Option<u32>,
    pub collection: Option<String>,
}

impl ProductQuery {
    /// Query parameters in a stable order, as sent to `/products`
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category_id) = &self.category_id {
            params.push(("categoryId", category_id.clone()));
        }
        if let Some(section) = &self.section {
            params.push(("section", section.clone()));
        }
        if let Some(filter) = self.filter {
            params.push(("filter", filter.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(min_discount) = self.min_discount {
            params.push(("minDiscount", min_discount.to_string()));
        }
        if let Some(collection) = &self.collection {
            params.push(("collection", collection.clone()));
        }
        params
    }

    /// Whether a product satisfies every criterion of the query (limit aside)
    pub fn accepts(&self, product: &Product) -> bool {
        self.category_id
            .as_deref()
            .map_or(true, |c| product.category_id.as_deref() == Some(c))
            && self.section.as_deref().map_or(true, |s| product.has_section(s))
            && self.filter.map_or(true, |f| f.matches(product))
            && self
                .min_discount
                .map_or(true, |d| product.discount.unwrap_or(0) >= d)
            && self
                .collection
                .as_deref()
                .map_or(true, |c| product.collection.as_deref() == Some(c))
    }
}

// ============================================================================
// COLLABORATOR TRAIT
// ============================================================================

/// Catalog REST collaborators, consumed read-only.
///
/// List methods return what the public endpoints return; callers still check
/// `is_active` where the contract requires it.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn sliders(&self) -> Result<Vec<Slider>, CatalogError>;

    async fn categories(&self) -> Result<Vec<Category>, CatalogError>;

    async fn departments(&self) -> Result<Vec<Department>, CatalogError>;

    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError>;

    async fn subcategories(&self) -> Result<Vec<Subcategory>, CatalogError>;

    async fn banners(&self) -> Result<Vec<Banner>, CatalogError>;

    /// `GET /banners/detail/{id}`
    async fn banner(&self, id: &str) -> Result<Banner, CatalogError>;

    async fn video_banners(&self) -> Result<Vec<VideoBanner>, CatalogError>;

    async fn brands(&self) -> Result<Vec<Brand>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn product() -> Product {
        Product {
            id: "p1".into(),
            name: "Vitamin C Serum".into(),
            slug: None,
            price: 30.0,
            sale_price: Some(24.0),
            image_url: None,
            brand: None,
            sections: vec!["New Arrivals".into()],
            category_id: Some("skincare".into()),
            is_featured: true,
            is_new_arrival: false,
            is_trending: false,
            discount: Some(20),
            collection: None,
        }
    }

    #[test]
    fn test_has_section_is_case_insensitive() {
        let p = product();
        assert!(p.has_section("new arrivals"));
        assert!(p.has_section(" New Arrivals "));
        assert!(!p.has_section("Best Sellers"));
    }

    #[test]
    fn test_display_price() {
        let mut p = product();
        assert_eq!(p.display_price(), 24.0);
        p.sale_price = Some(40.0);
        assert_eq!(p.display_price(), 30.0);
    }

    #[test]
    fn test_query_params_order() {
        let query = ProductQuery {
            section: Some("Sale".into()),
            limit: Some(8),
            min_discount: Some(10),
            ..Default::default()
        };
        assert_eq!(
            query.params(),
            vec![
                ("section", "Sale".to_string()),
                ("limit", "8".to_string()),
                ("minDiscount", "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_accepts() {
        let p = product();
        let featured = ProductQuery {
            filter: Some(ProductFilter::Featured),
            ..Default::default()
        };
        assert!(featured.accepts(&p));

        let trending = ProductQuery {
            filter: Some(ProductFilter::Trending),
            ..Default::default()
        };
        assert!(!trending.accepts(&p));

        let deep_discount = ProductQuery {
            min_discount: Some(50),
            ..Default::default()
        };
        assert!(!deep_discount.accepts(&p));
    }

    #[test]
    fn test_banner_accepts_location_alias() {
        let banner: Banner = serde_json::from_value(serde_json::json!({
            "_id": "b1",
            "imageUrl": "/b.jpg",
            "location": "after-hero",
            "isActive": true
        }))
        .unwrap();
        assert_eq!(banner.id, "b1");
        assert_eq!(banner.position.as_deref(), Some("after-hero"));
    }
}
