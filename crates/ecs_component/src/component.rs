//! The [`Component`] trait.
//!
//! Components are plain data records. Every type stored in a
//! [`ComponentStore`](crate::store::ComponentStore) implements this trait; an
//! entity holds at most one value of each component type.

/// Marker trait for component data.
///
/// # Examples
///
/// ```rust
/// use ecs_component::Component;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: 'static {
    /// A human-readable name used in errors and logs.
    ///
    /// Defaults to the Rust type path.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health;
    impl Component for Health {}

    struct Named;
    impl Component for Named {
        fn type_name() -> &'static str {
            "Named"
        }
    }

    #[test]
    fn test_default_type_name_is_type_path() {
        assert!(Health::type_name().ends_with("Health"));
    }

    #[test]
    fn test_type_name_override() {
        assert_eq!(Named::type_name(), "Named");
    }
}
