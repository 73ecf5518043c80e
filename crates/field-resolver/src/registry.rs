use indexmap::IndexMap;

use crate::{DispatchError, DispatchResult, Dispatcher, FieldCoordinate, ResolutionRequest, ResolverOutcome, Value};

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("A resolver is already registered for '{0}'")]
pub struct DuplicateResolver(pub FieldCoordinate);

/// Dispatchers by field coordinate.
pub struct ResolverRegistry<C> {
    dispatchers: IndexMap<FieldCoordinate, Dispatcher<C>>,
}

impl<C> Default for ResolverRegistry<C> {
    fn default() -> Self {
        Self {
            dispatchers: IndexMap::new(),
        }
    }
}

impl<C: Send + Sync + 'static> ResolverRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, coordinate: FieldCoordinate, dispatcher: Dispatcher<C>) -> Result<(), DuplicateResolver> {
        if self.dispatchers.contains_key(&coordinate) {
            return Err(DuplicateResolver(coordinate));
        }
        tracing::debug!(
            "Registering resolver '{}' for '{coordinate}'",
            dispatcher.descriptor().name()
        );
        self.dispatchers.insert(coordinate, dispatcher);
        Ok(())
    }

    pub fn get(&self, coordinate: &FieldCoordinate) -> Option<&Dispatcher<C>> {
        self.dispatchers.get(coordinate)
    }

    /// Registered coordinates, in registration order.
    pub fn coordinates(&self) -> impl Iterator<Item = &FieldCoordinate> {
        self.dispatchers.keys()
    }

    pub fn len(&self) -> usize {
        self.dispatchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatchers.is_empty()
    }

    /// Dispatches the request to the resolver registered for its field.
    pub fn dispatch<'a>(&'a self, request: ResolutionRequest<'a, C>) -> DispatchResult<ResolverOutcome<'a>> {
        let coordinate = &request.field.coordinate;
        match self.dispatchers.get(coordinate) {
            Some(dispatcher) => dispatcher.dispatch(request),
            None => Err(DispatchError::UnknownField {
                coordinate: coordinate.clone(),
            }),
        }
    }

    pub async fn resolve(&self, request: ResolutionRequest<'_, C>) -> DispatchResult<Value> {
        self.dispatch(request)?.await
    }
}
