//! Static admin-set authorizer.

use crate::ports::Authorizer;
use shared_types::Address;
use std::collections::HashSet;

/// Authorizer backed by a fixed set of admin addresses.
pub struct StaticAuthorizer {
    admins: HashSet<Address>,
}

impl StaticAuthorizer {
    pub fn new(admins: impl IntoIterator<Item = Address>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

impl Authorizer for StaticAuthorizer {
    fn is_admin(&self, caller: &Address) -> bool {
        self.admins.contains(caller)
    }
}
