//! The two catalog use cases and the strategies that gate them.

use async_trait::async_trait;
use chrono::Utc;
use sluice_core::{
    AuthenticationVerifier, AuthorisationEnforcer, BusinessRuleValidator, CancellationToken,
    InputPort, Interactor, Validator,
};

use crate::domain::{Caller, Catalog, CatalogAccess, FieldViolations, Product};

// ---- create product ---------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub price_cents: i64,
    pub caller: Caller,
}

impl<O: CreateProductOutputPort> InputPort<O> for CreateProduct {}

#[async_trait]
pub trait CreateProductOutputPort: Send + Sync + 'static {
    async fn present_created(
        &self,
        product: Product,
        token: &CancellationToken,
    ) -> anyhow::Result<()>;
}

/// Anyone who identifies themselves is authenticated.
pub struct KnownCallerVerifier;

#[async_trait]
impl AuthenticationVerifier<CreateProduct> for KnownCallerVerifier {
    async fn authenticate(
        &self,
        input: &CreateProduct,
        _token: &CancellationToken,
    ) -> anyhow::Result<bool> {
        Ok(input.caller != Caller::Anonymous)
    }
}

/// Only managers may add to the catalog.
pub struct ManagerOnlyEnforcer;

#[async_trait]
impl AuthorisationEnforcer<CreateProduct, CatalogAccess> for ManagerOnlyEnforcer {
    async fn check_authorisation(
        &self,
        input: &CreateProduct,
        _token: &CancellationToken,
    ) -> anyhow::Result<CatalogAccess> {
        Ok(match input.caller {
            Caller::Manager => CatalogAccess {
                allowed: true,
                reason: String::new(),
            },
            _ => CatalogAccess {
                allowed: false,
                reason: "only managers may create products".into(),
            },
        })
    }
}

pub struct CreateProductValidator;

#[async_trait]
impl Validator<CreateProduct, FieldViolations> for CreateProductValidator {
    async fn validate(
        &self,
        input: &CreateProduct,
        _token: &CancellationToken,
    ) -> anyhow::Result<FieldViolations> {
        let mut violations = Vec::new();
        if input.name.trim().is_empty() {
            violations.push("name must not be empty".to_string());
        }
        if input.price_cents <= 0 {
            violations.push("price must be positive".to_string());
        }
        Ok(FieldViolations(violations))
    }
}

/// Product names are unique in the catalog.
pub struct UniqueNameRule {
    pub catalog: Catalog,
}

#[async_trait]
impl BusinessRuleValidator<CreateProduct, FieldViolations> for UniqueNameRule {
    async fn validate(
        &self,
        input: &CreateProduct,
        _token: &CancellationToken,
    ) -> anyhow::Result<FieldViolations> {
        let mut violations = Vec::new();
        if self.catalog.contains(&input.name) {
            violations.push(format!("a product named '{}' already exists", input.name));
        }
        Ok(FieldViolations(violations))
    }
}

pub struct CreateProductInteractor {
    pub catalog: Catalog,
}

#[async_trait]
impl<O: CreateProductOutputPort> Interactor<CreateProduct, O> for CreateProductInteractor {
    async fn handle(
        &self,
        input: &CreateProduct,
        output: &O,
        token: &CancellationToken,
    ) -> anyhow::Result<()> {
        let product = Product {
            name: input.name.clone(),
            price_cents: input.price_cents,
            created_at: Utc::now(),
        };
        self.catalog.insert(product.clone());
        output.present_created(product, token).await
    }
}

// ---- get product ------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GetProduct {
    pub name: String,
}

impl<O: GetProductOutputPort> InputPort<O> for GetProduct {}

#[async_trait]
pub trait GetProductOutputPort: Send + Sync + 'static {
    async fn present_product(
        &self,
        name: &str,
        product: Option<Product>,
        token: &CancellationToken,
    ) -> anyhow::Result<()>;
}

pub struct GetProductInteractor {
    pub catalog: Catalog,
}

#[async_trait]
impl<O: GetProductOutputPort> Interactor<GetProduct, O> for GetProductInteractor {
    async fn handle(
        &self,
        input: &GetProduct,
        output: &O,
        token: &CancellationToken,
    ) -> anyhow::Result<()> {
        output
            .present_product(&input.name, self.catalog.get(&input.name), token)
            .await
    }
}
