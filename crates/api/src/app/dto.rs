use serde::Deserialize;

use storefront_catalog::{Product, ProductUpdate, Review, SearchPage};

// -------------------------
// Request DTOs
// -------------------------

/// Query parameters for the catalog listing. `page` is kept as raw text so a
/// non-numeric value degrades to the default instead of rejecting the
/// request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub keyword: Option<String>,
}

impl ListParams {
    pub fn page_number(&self) -> Option<u64> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub count_in_stock: Option<i64>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(req: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: req.name,
            image: req.image,
            brand: req.brand,
            category: req.category,
            description: req.description,
            price: req.price,
            count_in_stock: req.count_in_stock,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i64,
    pub comment: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id.to_string(),
        "user": product.owner.to_string(),
        "name": product.name,
        "image": product.image,
        "brand": product.brand,
        "category": product.category,
        "description": product.description,
        "price": product.price,
        "countInStock": product.count_in_stock,
        "sizes": product.sizes,
        "reviews": product.reviews.into_iter().map(review_to_json).collect::<Vec<_>>(),
        "numReviews": product.num_reviews,
        "rating": product.rating,
        "createdAt": product.created_at.to_rfc3339(),
        "updatedAt": product.updated_at.to_rfc3339(),
    })
}

fn review_to_json(review: Review) -> serde_json::Value {
    serde_json::json!({
        "user": review.reviewer.to_string(),
        "name": review.reviewer_name,
        "rating": review.rating,
        "comment": review.comment,
        "createdAt": review.created_at.to_rfc3339(),
    })
}

pub fn search_page_to_json(page: SearchPage) -> serde_json::Value {
    serde_json::json!({
        "products": page.products.into_iter().map(product_to_json).collect::<Vec<_>>(),
        "page": page.page,
        "pages": page.pages,
    })
}
