/// Authorization predicate for grid-status writes.
///
/// The ledger only asks one question; ownership models (single owner,
/// role lists, external policy) stay behind this seam.
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, caller: &str) -> bool;
}

/// Exactly one configured identity may write.
pub struct SingleOwner {
    owner: String,
}

impl SingleOwner {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}

impl Authorizer for SingleOwner {
    fn is_authorized(&self, caller: &str) -> bool {
        caller == self.owner
    }
}
