//! Shared doubles for pipeline tests: a small order-placement use case with
//! recording presenters and scripted strategies.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use sluice_core::prelude::*;

/// Request double. Pairs with any output port so tests can drive it at both
/// capability-rich and capability-free presenters.
pub struct PlaceOrder {
    pub sku: String,
    pub quantity: u32,
}

impl PlaceOrder {
    pub fn sample() -> Self {
        Self {
            sku: "sku-42".into(),
            quantity: 3,
        }
    }
}

impl<O: Send + Sync + 'static> InputPort<O> for PlaceOrder {}

#[derive(Debug, Clone, PartialEq)]
pub struct Violations(pub Vec<String>);

impl ValidationResult for Violations {
    fn is_valid(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: &'static str,
}

impl AuthorisationResult for AccessDecision {
    fn is_authorised(&self) -> bool {
        self.allowed
    }
}

/// Everything a presenter was asked to show, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Presented {
    Unauthenticated,
    Unauthorised(&'static str),
    InvalidInput(Vec<String>),
    RuleBroken(Vec<String>),
    OrderPlaced(String),
}

/// Output port implementing every capability, recording each presentation.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<Presented>>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Presented> {
        self.events.lock().clone()
    }

    pub fn record(&self, event: Presented) {
        self.events.lock().push(event);
    }
}

#[async_trait]
impl AuthenticationOutputPort for RecordingPresenter {
    async fn present_unauthenticated(&self, _token: &CancellationToken) -> anyhow::Result<()> {
        self.record(Presented::Unauthenticated);
        Ok(())
    }
}

#[async_trait]
impl AuthorisationOutputPort<AccessDecision> for RecordingPresenter {
    async fn present_unauthorised(
        &self,
        result: AccessDecision,
        _token: &CancellationToken,
    ) -> anyhow::Result<()> {
        self.record(Presented::Unauthorised(result.reason));
        Ok(())
    }
}

#[async_trait]
impl ValidationOutputPort<Violations> for RecordingPresenter {
    async fn present_validation_failure(
        &self,
        result: Violations,
        _token: &CancellationToken,
    ) -> anyhow::Result<()> {
        self.record(Presented::InvalidInput(result.0));
        Ok(())
    }
}

#[async_trait]
impl BusinessRuleOutputPort<Violations> for RecordingPresenter {
    async fn present_business_rule_failure(
        &self,
        result: Violations,
        _token: &CancellationToken,
    ) -> anyhow::Result<()> {
        self.record(Presented::RuleBroken(result.0));
        Ok(())
    }
}

/// Output port with no capabilities at all; only the interactor can reach it.
#[derive(Clone, Default)]
pub struct PlainPresenter {
    pub handled: Arc<AtomicUsize>,
}

impl PlainPresenter {
    pub fn handled(&self) -> usize {
        self.handled.load(Ordering::SeqCst)
    }
}

pub struct PlaceOrderInteractor;

#[async_trait]
impl Interactor<PlaceOrder, RecordingPresenter> for PlaceOrderInteractor {
    async fn handle(
        &self,
        input: &PlaceOrder,
        output: &RecordingPresenter,
        _token: &CancellationToken,
    ) -> anyhow::Result<()> {
        output.record(Presented::OrderPlaced(input.sku.clone()));
        Ok(())
    }
}

#[async_trait]
impl Interactor<PlaceOrder, PlainPresenter> for PlaceOrderInteractor {
    async fn handle(
        &self,
        _input: &PlaceOrder,
        output: &PlainPresenter,
        _token: &CancellationToken,
    ) -> anyhow::Result<()> {
        output.handled.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Counts calls and returns a fixed verdict.
pub struct ScriptedAuthenticator {
    pub authenticated: bool,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AuthenticationVerifier<PlaceOrder> for ScriptedAuthenticator {
    async fn authenticate(
        &self,
        _input: &PlaceOrder,
        _token: &CancellationToken,
    ) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.authenticated)
    }
}

pub struct ScriptedEnforcer {
    pub decision: AccessDecision,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AuthorisationEnforcer<PlaceOrder, AccessDecision> for ScriptedEnforcer {
    async fn check_authorisation(
        &self,
        _input: &PlaceOrder,
        _token: &CancellationToken,
    ) -> anyhow::Result<AccessDecision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.decision.clone())
    }
}

pub struct ScriptedValidator {
    pub violations: Vec<String>,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Validator<PlaceOrder, Violations> for ScriptedValidator {
    async fn validate(
        &self,
        _input: &PlaceOrder,
        _token: &CancellationToken,
    ) -> anyhow::Result<Violations> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Violations(self.violations.clone()))
    }
}

pub struct ScriptedRuleValidator {
    pub violations: Vec<String>,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl BusinessRuleValidator<PlaceOrder, Violations> for ScriptedRuleValidator {
    async fn validate(
        &self,
        _input: &PlaceOrder,
        _token: &CancellationToken,
    ) -> anyhow::Result<Violations> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Violations(self.violations.clone()))
    }
}

/// Fails its strategy call outright.
pub struct FailingValidator;

#[async_trait]
impl Validator<PlaceOrder, Violations> for FailingValidator {
    async fn validate(
        &self,
        _input: &PlaceOrder,
        _token: &CancellationToken,
    ) -> anyhow::Result<Violations> {
        Err(anyhow::anyhow!("validator backend unavailable"))
    }
}

/// Cancels the invocation token mid-flight, then reports a clean result.
pub struct CancellingValidator {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Validator<PlaceOrder, Violations> for CancellingValidator {
    async fn validate(
        &self,
        _input: &PlaceOrder,
        token: &CancellationToken,
    ) -> anyhow::Result<Violations> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        token.cancel();
        Ok(Violations(Vec::new()))
    }
}

pub fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

pub fn count(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
