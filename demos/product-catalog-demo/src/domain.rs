//! Catalog domain: products, the in-memory store, and the result types the
//! pipeline's gates present.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use sluice_core::{AuthorisationResult, ValidationResult};

#[derive(Debug, Clone)]
pub struct Product {
    pub name: String,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Who is asking. The demo derives authentication and authorisation from
/// this alone; a real application would consult session or token state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Clerk,
    Manager,
}

#[derive(Clone, Default)]
pub struct Catalog {
    products: Arc<Mutex<HashMap<String, Product>>>,
}

impl Catalog {
    pub fn contains(&self, name: &str) -> bool {
        self.products.lock().unwrap().contains_key(name)
    }

    pub fn insert(&self, product: Product) {
        self.products
            .lock()
            .unwrap()
            .insert(product.name.clone(), product);
    }

    pub fn get(&self, name: &str) -> Option<Product> {
        self.products.lock().unwrap().get(name).cloned()
    }
}

#[derive(Debug, Clone)]
pub struct FieldViolations(pub Vec<String>);

impl ValidationResult for FieldViolations {
    fn is_valid(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CatalogAccess {
    pub allowed: bool,
    pub reason: String,
}

impl AuthorisationResult for CatalogAccess {
    fn is_authorised(&self) -> bool {
        self.allowed
    }
}
