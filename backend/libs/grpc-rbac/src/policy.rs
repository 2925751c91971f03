//! Method → allowed-roles table

use std::collections::{HashMap, HashSet};

/// Static authorization table keyed by fully-qualified gRPC method name
/// (`/package.Service/Method`).
///
/// Built once at startup and never mutated afterwards. A method with no entry
/// is publicly accessible.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: HashMap<String, HashSet<String>>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `roles` to call `method`, extending any roles already granted.
    pub fn allow<I, R>(mut self, method: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.rules
            .entry(method.into())
            .or_default()
            .extend(roles.into_iter().map(Into::into));
        self
    }

    /// Roles permitted to call `method`, or `None` if the method is public.
    pub fn allowed_roles(&self, method: &str) -> Option<&HashSet<String>> {
        self.rules.get(method)
    }

    pub fn is_public(&self, method: &str) -> bool {
        !self.rules.contains_key(method)
    }

    pub fn permits(&self, method: &str, role: &str) -> bool {
        match self.rules.get(method) {
            Some(roles) => roles.contains(role),
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<M, I, R> FromIterator<(M, I)> for AccessPolicy
where
    M: Into<String>,
    I: IntoIterator<Item = R>,
    R: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (M, I)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(AccessPolicy::new(), |policy, (method, roles)| {
                policy.allow(method, roles)
            })
    }
}
