use crate::domain::model::{Address, PostalCode, SequencePolicy};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Handle to a single text control of the form.
///
/// Methods take `&self`: a handle behaves like a DOM element reference, and the
/// binder writes through it while the caller keeps its own copy.
pub trait FormField: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    /// Caret offset in characters, `None` when the control does not report one.
    fn selection_start(&self) -> Option<usize>;
    fn set_selection_range(&self, start: usize, end: usize);
    fn has_focus(&self) -> bool;
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, cep: &PostalCode) -> Result<Address>;
}

#[async_trait]
impl<T: AddressLookup + ?Sized> AddressLookup for Arc<T> {
    async fn lookup(&self, cep: &PostalCode) -> Result<Address> {
        (**self).lookup(cep).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn lookup_base_url(&self) -> &str;
    fn sequence_policy(&self) -> SequencePolicy;
    fn user_agent(&self) -> Option<&str>;
}
