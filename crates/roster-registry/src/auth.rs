//! Authorization capability.
//!
//! Callers do not present credentials. Instead they assert the current name
//! of the entity acting on their behalf, and whoever can supply the correct
//! name is treated as authorized. The check lives behind [`Authorizer`] so a
//! credential-verifying implementation can replace it without touching the
//! registry.

/// Decides whether an asserted name authorizes an action.
pub trait Authorizer: Send + Sync {
    /// `asserted_name` comes from the caller; `actual_name` is the stored
    /// name the assertion is checked against.
    fn authorize(&self, asserted_name: &str, actual_name: &str) -> bool;
}

/// Authorizes when the asserted name equals the stored name exactly.
#[derive(Clone, Copy, Debug, Default)]
pub struct NameMatchAuthorizer;

impl Authorizer for NameMatchAuthorizer {
    fn authorize(&self, asserted_name: &str, actual_name: &str) -> bool {
        asserted_name == actual_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        let auth = NameMatchAuthorizer;
        assert!(auth.authorize("Eng", "Eng"));
        assert!(!auth.authorize("eng", "Eng"));
        assert!(!auth.authorize("Eng ", "Eng"));
    }

    #[test]
    fn usable_as_trait_object() {
        let auth: Box<dyn Authorizer> = Box::new(NameMatchAuthorizer);
        assert!(auth.authorize("Acme", "Acme"));
    }
}
