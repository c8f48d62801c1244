use crate::core::mask::{apply_mask, normalize_cep};
use crate::domain::model::{Address, FieldKind, PostalCode, SequencePolicy};
use crate::domain::ports::{AddressLookup, FormField};
use std::sync::atomic::{AtomicU64, Ordering};

/// The controls the binder drives. Only the CEP field is required.
#[derive(Debug, Clone)]
pub struct AddressForm<F: FormField> {
    pub cep: F,
    pub street: Option<F>,
    pub neighborhood: Option<F>,
    pub city: Option<F>,
    pub state: Option<F>,
    pub complement: Option<F>,
}

impl<F: FormField> AddressForm<F> {
    pub fn new(cep: F) -> Self {
        Self {
            cep,
            street: None,
            neighborhood: None,
            city: None,
            state: None,
            complement: None,
        }
    }

    /// Builds the form from a lookup by element id. `None` when there is no CEP control.
    pub fn resolve(mut find: impl FnMut(&str) -> Option<F>) -> Option<Self> {
        let cep = find(FieldKind::Cep.element_id())?;
        Some(Self {
            cep,
            street: find(FieldKind::Street.element_id()),
            neighborhood: find(FieldKind::Neighborhood.element_id()),
            city: find(FieldKind::City.element_id()),
            state: find(FieldKind::State.element_id()),
            complement: find(FieldKind::Complement.element_id()),
        })
    }

    pub fn with_field(mut self, kind: FieldKind, field: F) -> Self {
        match kind {
            FieldKind::Cep => self.cep = field,
            FieldKind::Street => self.street = Some(field),
            FieldKind::Neighborhood => self.neighborhood = Some(field),
            FieldKind::City => self.city = Some(field),
            FieldKind::State => self.state = Some(field),
            FieldKind::Complement => self.complement = Some(field),
        }
        self
    }

    pub fn field(&self, kind: FieldKind) -> Option<&F> {
        match kind {
            FieldKind::Cep => Some(&self.cep),
            FieldKind::Street => self.street.as_ref(),
            FieldKind::Neighborhood => self.neighborhood.as_ref(),
            FieldKind::City => self.city.as_ref(),
            FieldKind::State => self.state.as_ref(),
            FieldKind::Complement => self.complement.as_ref(),
        }
    }

    /// Copies a lookup result into the form.
    ///
    /// Street, neighborhood, city and state are always overwritten (empty when the
    /// address lacks them). Complement is only written when non-empty, so text the
    /// user typed there survives a sparse response.
    pub fn fill(&self, address: &Address) {
        for kind in FieldKind::ADDRESS_FIELDS {
            let Some(field) = self.field(kind) else {
                continue;
            };
            let value = address.get(kind).unwrap_or_default();
            if kind == FieldKind::Complement && value.is_empty() {
                continue;
            }
            field.set_value(value);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlurOutcome {
    /// Fewer or more than 8 digits; nothing was requested.
    Skipped,
    /// The lookup failed or found nothing; the form was left untouched.
    Unavailable,
    /// A newer lookup was issued while this one was in flight.
    Superseded,
    Filled(Address),
}

/// Attaches the CEP mask and the address auto-fill to a form.
pub struct CepBinder<L: AddressLookup, F: FormField> {
    lookup: L,
    form: AddressForm<F>,
    policy: SequencePolicy,
    latest_request: AtomicU64,
}

impl<L: AddressLookup, F: FormField> CepBinder<L, F> {
    pub fn new(lookup: L, form: AddressForm<F>) -> Self {
        Self {
            lookup,
            form,
            policy: SequencePolicy::default(),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn with_policy(mut self, policy: SequencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn form(&self) -> &AddressForm<F> {
        &self.form
    }

    pub fn policy(&self) -> SequencePolicy {
        self.policy
    }

    /// Content-change handler for the CEP field.
    pub fn on_input(&self) {
        apply_mask(&self.form.cep);
    }

    /// Focus-loss handler for the CEP field.
    pub async fn on_blur(&self) -> BlurOutcome {
        let digits = normalize_cep(&self.form.cep.value());
        let Some(cep) = PostalCode::new(&digits) else {
            tracing::trace!("CEP incomplete ({} digits), skipping lookup", digits.len());
            return BlurOutcome::Skipped;
        };

        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(address) = self.find_address(&cep).await else {
            return BlurOutcome::Unavailable;
        };

        if self.policy == SequencePolicy::LastRequestWins
            && self.latest_request.load(Ordering::SeqCst) != token
        {
            tracing::debug!("Discarding stale lookup for CEP {} (request #{})", cep, token);
            return BlurOutcome::Superseded;
        }

        self.form.fill(&address);
        tracing::debug!("✅ Address for CEP {} written to form", cep);
        BlurOutcome::Filled(address)
    }

    /// Runs the lookup and collapses every failure into "no data".
    pub async fn find_address(&self, cep: &PostalCode) -> Option<Address> {
        match self.lookup.lookup(cep).await {
            Ok(address) => Some(address),
            Err(e) if e.is_lookup_unavailable() => {
                tracing::debug!("Lookup for CEP {} unavailable: {}", cep, e);
                None
            }
            Err(e) => {
                tracing::warn!("⚠️ Unexpected lookup failure for CEP {}: {}", cep, e);
                None
            }
        }
    }
}
