//! The filter-options collaborator.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use ucu_model::{FilterOptions, OptionScope};

use crate::error::LoadError;

/// Anything that can produce option lists for a scope.
///
/// The returned future must not borrow `self`; the loader may hand it to
/// several waiters.
pub trait OptionsSource: Send + Sync {
    fn fetch(&self, scope: &OptionScope) -> BoxFuture<'static, Result<FilterOptions, LoadError>>;
}

impl<T: OptionsSource + ?Sized> OptionsSource for Arc<T> {
    fn fetch(&self, scope: &OptionScope) -> BoxFuture<'static, Result<FilterOptions, LoadError>> {
        (**self).fetch(scope)
    }
}
