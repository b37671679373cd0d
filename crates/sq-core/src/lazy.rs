//! Explicitly loaded attributes.
//!
//! Some object attributes cost an extra request (a task's scanner context,
//! the project count of a portfolio). They start [`Lazy::Unloaded`] and are
//! filled by an explicit client call; reading never triggers a fetch.

/// An attribute that is either not fetched yet or fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Lazy<T> {
    #[default]
    Unloaded,
    Loaded(T),
}

impl<T> Lazy<T> {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The loaded value, or `None` while unloaded.
    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        match self {
            Self::Unloaded => None,
            Self::Loaded(value) => Some(value),
        }
    }

    /// Store a freshly fetched value, replacing any previous one.
    pub fn set(&mut self, value: T) -> &T {
        *self = Self::Loaded(value);
        match self {
            Self::Loaded(value) => value,
            Self::Unloaded => unreachable!("value was just stored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unloaded() {
        let lazy: Lazy<u32> = Lazy::default();
        assert!(!lazy.is_loaded());
        assert_eq!(lazy.get(), None);
    }

    #[test]
    fn set_loads_and_replaces() {
        let mut lazy = Lazy::Unloaded;
        assert_eq!(*lazy.set(3), 3);
        assert_eq!(lazy.get(), Some(&3));
        lazy.set(4);
        assert_eq!(lazy.get(), Some(&4));
    }
}
