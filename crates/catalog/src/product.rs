use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CatalogError, ProductId, UserId};

/// Categories whose products must carry a non-empty size run.
const SIZED_CATEGORIES: [&str; 2] = ["clothes", "shoes"];

/// Whether a category requires sizes (trimmed, lower-cased exact match).
pub fn requires_sizes(category: &str) -> bool {
    let category = category.trim().to_lowercase();
    SIZED_CATEGORIES.contains(&category.as_str())
}

/// A single user review, nested inside its product document.
///
/// `reviewer_name` is captured at submission time and never re-derived from
/// the user record afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: UserId,
    pub reviewer_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A sellable item, persisted as a single document.
///
/// `num_reviews` and `rating` are derived from `reviews` and are only ever
/// recomputed through [`Product::push_review`]; no inbound field maps onto
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub owner: UserId,
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub count_in_stock: i64,
    pub sizes: Vec<String>,
    pub reviews: Vec<Review>,
    pub num_reviews: u32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Append a review, enforcing one review per reviewer, and recompute the
    /// derived aggregate fields.
    pub fn push_review(&mut self, review: Review) -> Result<(), CatalogError> {
        if self.reviews.iter().any(|r| r.reviewer == review.reviewer) {
            return Err(CatalogError::DuplicateReview);
        }
        self.reviews.push(review);
        self.recompute_rating();
        Ok(())
    }

    fn recompute_rating(&mut self) {
        self.num_reviews = self.reviews.len() as u32;
        self.rating = if self.reviews.is_empty() {
            0.0
        } else {
            let total: f64 = self.reviews.iter().map(|r| f64::from(r.rating)).sum();
            total / self.reviews.len() as f64
        };
    }

    /// Merge a partial update, last-write-wins on truthy values only: an
    /// empty string, a zero, or an absent field leaves the stored value
    /// unchanged. A caller cannot zero out a numeric field through this path.
    pub fn apply_update(&mut self, fields: ProductUpdate, now: DateTime<Utc>) {
        replace_nonempty(&mut self.name, fields.name);
        replace_nonempty(&mut self.image, fields.image);
        replace_nonempty(&mut self.brand, fields.brand);
        replace_nonempty(&mut self.category, fields.category);
        replace_nonempty(&mut self.description, fields.description);
        if let Some(price) = fields.price {
            if price != 0.0 && !price.is_nan() {
                self.price = price;
            }
        }
        if let Some(count) = fields.count_in_stock {
            if count != 0 {
                self.count_in_stock = count;
            }
        }
        self.updated_at = now;
    }
}

fn replace_nonempty(slot: &mut String, candidate: Option<String>) {
    if let Some(value) = candidate {
        if !value.is_empty() {
            *slot = value;
        }
    }
}

/// Sizes as submitted: either a structured list (stored as given) or a
/// comma-separated blob (split, trimmed, empty tokens dropped).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SizesInput {
    List(Vec<String>),
    Text(String),
}

impl SizesInput {
    pub fn normalize(self) -> Vec<String> {
        match self {
            SizesInput::List(sizes) => sizes,
            SizesInput::Text(blob) => blob
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

/// Raw creation fields as they arrive from the admin form; numeric fields
/// are still text at this point.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub count_in_stock: Option<String>,
    pub sizes: Option<SizesInput>,
}

impl ProductDraft {
    /// Validate the draft into a storable product.
    ///
    /// Every failing field is collected, so one round trip reports the whole
    /// set; each fragment names its field.
    pub fn validate(
        self,
        image: Option<String>,
        owner: UserId,
        id: ProductId,
        now: DateTime<Utc>,
    ) -> Result<Product, CatalogError> {
        let mut problems: Vec<&'static str> = Vec::new();

        let image = match image.filter(|i| !i.trim().is_empty()) {
            Some(image) => image,
            None => {
                problems.push("Product image is required.");
                String::new()
            }
        };

        let name = required_text(self.name, "Product name is required.", &mut problems);
        let brand = required_text(self.brand, "Brand is required.", &mut problems);
        let category = required_text(self.category, "Category is required.", &mut problems);
        let description = required_text(self.description, "Description is required.", &mut problems);

        let price = match parse_price(self.price.as_deref()) {
            Some(price) => price,
            None => {
                problems.push("Product price is required and must be a positive number.");
                0.0
            }
        };

        let count_in_stock = match parse_count(self.count_in_stock.as_deref()) {
            Some(count) => count,
            None => {
                problems.push("Count in stock is required and must be a non-negative integer.");
                0
            }
        };

        let sizes = self.sizes.map(SizesInput::normalize).unwrap_or_default();
        if requires_sizes(&category) && sizes.is_empty() {
            problems.push("Sizes are required for clothes and shoes.");
        }

        if !problems.is_empty() {
            return Err(CatalogError::validation(problems.join(" ")));
        }

        Ok(Product {
            id,
            owner,
            name,
            image,
            brand,
            category,
            description,
            price,
            count_in_stock,
            sizes,
            reviews: Vec::new(),
            num_reviews: 0,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        })
    }
}

fn required_text(
    value: Option<String>,
    message: &'static str,
    problems: &mut Vec<&'static str>,
) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => {
            problems.push(message);
            String::new()
        }
    }
}

fn parse_price(raw: Option<&str>) -> Option<f64> {
    let price: f64 = raw?.trim().parse().ok()?;
    (price.is_finite() && price > 0.0).then_some(price)
}

fn parse_count(raw: Option<&str>) -> Option<i64> {
    let count: i64 = raw?.trim().parse().ok()?;
    (count >= 0).then_some(count)
}

/// Partial update fields; see [`Product::apply_update`] for the merge policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub count_in_stock: Option<i64>,
}
