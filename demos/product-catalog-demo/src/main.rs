mod domain;
mod use_cases;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sluice_core::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::domain::{Caller, Catalog, CatalogAccess, FieldViolations, Product};
use crate::use_cases::{
    CreateProduct, CreateProductInteractor, CreateProductOutputPort, CreateProductValidator,
    GetProduct, GetProductInteractor, GetProductOutputPort, KnownCallerVerifier,
    ManagerOnlyEnforcer, UniqueNameRule,
};

/// Writes every outcome to stdout. Implements the capability ports, so the
/// authentication, authorisation, validation and business-rule gates all
/// engage for use cases presented through it.
struct ConsolePresenter;

#[async_trait]
impl CreateProductOutputPort for ConsolePresenter {
    async fn present_created(&self, product: Product, _token: &CancellationToken) -> Result<()> {
        println!(
            "created '{}' at {} cents - {}",
            product.name, product.price_cents, product.created_at
        );
        Ok(())
    }
}

#[async_trait]
impl GetProductOutputPort for ConsolePresenter {
    async fn present_product(
        &self,
        name: &str,
        product: Option<Product>,
        _token: &CancellationToken,
    ) -> Result<()> {
        match product {
            Some(p) => println!("found '{}': {} cents", p.name, p.price_cents),
            None => println!("no product named '{name}'"),
        }
        Ok(())
    }
}

#[async_trait]
impl AuthenticationOutputPort for ConsolePresenter {
    async fn present_unauthenticated(&self, _token: &CancellationToken) -> Result<()> {
        println!("rejected: caller is not authenticated");
        Ok(())
    }
}

#[async_trait]
impl AuthorisationOutputPort<CatalogAccess> for ConsolePresenter {
    async fn present_unauthorised(
        &self,
        result: CatalogAccess,
        _token: &CancellationToken,
    ) -> Result<()> {
        println!("rejected: {}", result.reason);
        Ok(())
    }
}

#[async_trait]
impl ValidationOutputPort<FieldViolations> for ConsolePresenter {
    async fn present_validation_failure(
        &self,
        result: FieldViolations,
        _token: &CancellationToken,
    ) -> Result<()> {
        println!("invalid input: {}", result.0.join("; "));
        Ok(())
    }
}

#[async_trait]
impl BusinessRuleOutputPort<FieldViolations> for ConsolePresenter {
    async fn present_business_rule_failure(
        &self,
        result: FieldViolations,
        _token: &CancellationToken,
    ) -> Result<()> {
        println!("rule broken: {}", result.0.join("; "));
        Ok(())
    }
}

fn create(name: &str, price_cents: i64, caller: Caller) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        price_cents,
        caller,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let catalog = Catalog::default();
    tracing::info!("wiring product catalog use cases");

    let mut registry = ServiceRegistry::new();
    registry
        .wire::<CreateProduct, ConsolePresenter>()
        .authentication_verifier(KnownCallerVerifier)
        .enforcer(ManagerOnlyEnforcer)
        .validator(CreateProductValidator)
        .business_rule_validator(UniqueNameRule {
            catalog: catalog.clone(),
        })
        .interactor(CreateProductInteractor {
            catalog: catalog.clone(),
        });
    registry
        .wire::<GetProduct, ConsolePresenter>()
        .interactor(GetProductInteractor {
            catalog: catalog.clone(),
        });

    let pipeline = Sluice::builder()
        .authentication()
        .authorisation::<CatalogAccess>()
        .validation::<FieldViolations>()
        .business_rules::<FieldViolations>()
        .interactor()
        .build(Arc::new(registry));

    let presenter = ConsolePresenter;
    let token = CancellationToken::new();

    // Each request walks the same chain; the first gate with something to
    // say stops it.
    let requests = [
        create("Espresso Machine", 45_000, Caller::Anonymous),
        create("Espresso Machine", 45_000, Caller::Clerk),
        create("", -1, Caller::Manager),
        create("Espresso Machine", 45_000, Caller::Manager),
        create("Espresso Machine", 45_000, Caller::Manager),
    ];
    for request in &requests {
        pipeline.invoke(request, &presenter, &token).await?;
    }

    let lookups = [
        GetProduct {
            name: "Espresso Machine".to_string(),
        },
        GetProduct {
            name: "Grinder".to_string(),
        },
    ];
    for lookup in &lookups {
        pipeline.invoke(lookup, &presenter, &token).await?;
    }

    Ok(())
}
