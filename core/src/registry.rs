//! Service resolution - the typed registry behind every gate.
//!
//! Every pluggable piece of a use case (validator, enforcer, verifier,
//! interactor) is stored under a [`ServiceKey`] synthesized from the
//! capability it serves and the concrete port pair it was registered for.
//! Gates rebuild the same key from the running invocation and resolve it
//! fresh on every evaluation; a missing entry makes the gate inert rather
//! than failing the invocation.
//!
//! Absence-is-inert is a deliberate configuration choice, not swallowed
//! failure: it lets partial wirings (tests, dev environments) run a pipeline
//! without registering every strategy, at the cost of failing open when a
//! registration was forgotten. The gates log every inert pass-through at
//! `trace` level so a misconfigured pipeline can be spotted from the logs.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::binding::{GateBinding, InteractorBinding};
use crate::invocation::PortTypes;
use crate::port::{
    AuthenticationOutputPort, AuthorisationOutputPort, AuthorisationResult,
    BusinessRuleOutputPort, InputPort, ValidationOutputPort, ValidationResult,
};
use crate::strategy::{
    AuthenticationVerifier, AuthorisationEnforcer, BusinessRuleValidator, Interactor, Validator,
};

/// Marker occupying the capability slot of interactor keys.
struct UseCaseHandler;

/// Identifies one service binding: a capability (the trait-object type of the
/// capability port, which encodes the result type) plus the concrete port
/// pair it serves.
///
/// Type names ride along for diagnostics only; identity is the three
/// `TypeId`s.
#[derive(Clone, Copy, Debug)]
pub struct ServiceKey {
    service: TypeId,
    input: TypeId,
    output: TypeId,
    service_name: &'static str,
    input_name: &'static str,
    output_name: &'static str,
}

impl ServiceKey {
    /// Key for a capability-driven gate binding, e.g.
    /// `ServiceKey::capability::<dyn ValidationOutputPort<MyResult>>(ports)`.
    pub fn capability<C: ?Sized + 'static>(ports: PortTypes) -> Self {
        Self {
            service: TypeId::of::<C>(),
            input: ports.input_id(),
            output: ports.output_id(),
            service_name: type_name::<C>(),
            input_name: ports.input_name(),
            output_name: ports.output_name(),
        }
    }

    /// Key for the use-case handler of a port pair.
    pub fn interactor(ports: PortTypes) -> Self {
        Self::capability::<UseCaseHandler>(ports)
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.service == other.service && self.input == other.input && self.output == other.output
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.service.hash(state);
        self.input.hash(state);
        self.output.hash(state);
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for ({}, {})",
            self.service_name, self.input_name, self.output_name
        )
    }
}

/// An erased service instance as handed back by a resolver.
pub type ServiceHandle = Arc<dyn Any + Send + Sync>;

/// The lookup seam between the pipeline and whatever owns the services.
///
/// Passed explicitly into the pipeline at build time and threaded through
/// every stage; the engine holds no ambient state. Implementations must be
/// safe to call repeatedly and from concurrent invocations, and should
/// return the same binding for a key within one invocation.
///
/// Every gate resolves its key unconditionally; the miss doubles as the
/// capability check. Expect lookups for port pairs that never registered
/// anything, and answer them with `None` cheaply.
pub trait ServiceResolver: Send + Sync {
    fn resolve(&self, key: &ServiceKey) -> Option<ServiceHandle>;
}

/// Default [`ServiceResolver`]: a hash map of pre-bound adapters.
///
/// Registration is the typed side of the engine. [`wire`](Self::wire) opens
/// a binder for one concrete `(request, output port)` pair; the binder's
/// methods prove each capability through their where-clauses and store
/// adapters already bound to the concrete types, so resolution never needs
/// to reflect over anything.
///
/// ```rust,ignore
/// let mut services = ServiceRegistry::new();
/// services
///     .wire::<CreateProduct, ConsolePresenter>()
///     .enforcer(CreateProductEnforcer)
///     .validator(CreateProductValidator)
///     .interactor(CreateProductInteractor);
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<ServiceKey, ServiceHandle, ahash::RandomState>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a binder scoped to one concrete port pair.
    pub fn wire<I, O>(&mut self) -> UseCaseBinder<'_, I, O>
    where
        I: InputPort<O>,
        O: Send + Sync + 'static,
    {
        UseCaseBinder {
            registry: self,
            _ports: PhantomData,
        }
    }

    /// Stores a raw handle under an explicit key. Escape hatch for custom
    /// stages that define their own service shapes.
    pub fn insert(&mut self, key: ServiceKey, service: ServiceHandle) -> &mut Self {
        if self.services.insert(key, service).is_some() {
            tracing::debug!(%key, "replacing existing service binding");
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }
}

impl ServiceResolver for ServiceRegistry {
    fn resolve(&self, key: &ServiceKey) -> Option<ServiceHandle> {
        self.services.get(key).cloned()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("bindings", &self.services.len())
            .finish()
    }
}

/// Registration scope for one `(request, output port)` pair.
///
/// Every method stores a pre-bound adapter under the pair's key and hands
/// the binder back for chaining. Registering the same capability twice
/// replaces the earlier binding.
pub struct UseCaseBinder<'r, I, O> {
    registry: &'r mut ServiceRegistry,
    _ports: PhantomData<fn() -> (I, O)>,
}

impl<I, O> UseCaseBinder<'_, I, O>
where
    I: InputPort<O>,
    O: Send + Sync + 'static,
{
    /// Binds an authentication verifier for this pair.
    pub fn authentication_verifier<V>(self, verifier: V) -> Self
    where
        O: AuthenticationOutputPort,
        V: AuthenticationVerifier<I> + 'static,
    {
        self.registry.insert(
            ServiceKey::capability::<dyn AuthenticationOutputPort>(PortTypes::of::<I, O>()),
            Arc::new(GateBinding::authentication::<I, O, _>(verifier)),
        );
        self
    }

    /// Binds an authorisation enforcer for this pair.
    pub fn enforcer<R, E>(self, enforcer: E) -> Self
    where
        O: AuthorisationOutputPort<R>,
        R: AuthorisationResult,
        E: AuthorisationEnforcer<I, R> + 'static,
    {
        self.registry.insert(
            ServiceKey::capability::<dyn AuthorisationOutputPort<R>>(PortTypes::of::<I, O>()),
            Arc::new(GateBinding::authorisation::<I, O, R, _>(enforcer)),
        );
        self
    }

    /// Binds an input-port validator for this pair.
    pub fn validator<R, V>(self, validator: V) -> Self
    where
        O: ValidationOutputPort<R>,
        R: ValidationResult,
        V: Validator<I, R> + 'static,
    {
        self.registry.insert(
            ServiceKey::capability::<dyn ValidationOutputPort<R>>(PortTypes::of::<I, O>()),
            Arc::new(GateBinding::validation::<I, O, R, _>(validator)),
        );
        self
    }

    /// Binds a business-rule validator for this pair.
    pub fn business_rule_validator<R, V>(self, validator: V) -> Self
    where
        O: BusinessRuleOutputPort<R>,
        R: ValidationResult,
        V: BusinessRuleValidator<I, R> + 'static,
    {
        self.registry.insert(
            ServiceKey::capability::<dyn BusinessRuleOutputPort<R>>(PortTypes::of::<I, O>()),
            Arc::new(GateBinding::business_rules::<I, O, R, _>(validator)),
        );
        self
    }

    /// Binds the use-case handler for this pair.
    pub fn interactor<T>(self, interactor: T) -> Self
    where
        T: Interactor<I, O> + 'static,
    {
        self.registry.insert(
            ServiceKey::interactor(PortTypes::of::<I, O>()),
            Arc::new(InteractorBinding::new::<I, O, _>(interactor)),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::ValidationOutputPort;
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    struct Request;
    impl<O: Send + Sync + 'static> InputPort<O> for Request {}

    struct Flags(bool);
    impl ValidationResult for Flags {
        fn is_valid(&self) -> bool {
            self.0
        }
    }

    struct Presenter;
    #[async_trait]
    impl ValidationOutputPort<Flags> for Presenter {
        async fn present_validation_failure(
            &self,
            _result: Flags,
            _token: &CancellationToken,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct AlwaysValid;
    #[async_trait]
    impl Validator<Request, Flags> for AlwaysValid {
        async fn validate(
            &self,
            _input: &Request,
            _token: &CancellationToken,
        ) -> anyhow::Result<Flags> {
            Ok(Flags(true))
        }
    }

    #[test]
    fn key_identity_is_the_type_triple() {
        let ports = PortTypes::of::<Request, Presenter>();
        let a = ServiceKey::capability::<dyn ValidationOutputPort<Flags>>(ports);
        let b = ServiceKey::capability::<dyn ValidationOutputPort<Flags>>(ports);
        assert_eq!(a, b);

        let other_pair =
            ServiceKey::capability::<dyn ValidationOutputPort<Flags>>(PortTypes::of::<
                Request,
                String,
            >());
        assert_ne!(a, other_pair);

        let interactor = ServiceKey::interactor(ports);
        assert_ne!(a, interactor);
    }

    #[test]
    fn registered_validator_resolves_under_its_key() {
        let mut registry = ServiceRegistry::new();
        registry.wire::<Request, Presenter>().validator(AlwaysValid);

        let key = ServiceKey::capability::<dyn ValidationOutputPort<Flags>>(PortTypes::of::<
            Request,
            Presenter,
        >());
        assert!(registry.resolve(&key).is_some());

        let wrong_pair =
            ServiceKey::capability::<dyn ValidationOutputPort<Flags>>(PortTypes::of::<
                Request,
                String,
            >());
        assert!(registry.resolve(&wrong_pair).is_none());
    }

    #[test]
    fn re_registration_replaces_the_binding() {
        let mut registry = ServiceRegistry::new();
        registry.wire::<Request, Presenter>().validator(AlwaysValid);
        registry.wire::<Request, Presenter>().validator(AlwaysValid);
        assert_eq!(registry.len(), 1);
    }
}
