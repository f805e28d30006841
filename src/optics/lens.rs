//! Lens optics for focusing on struct fields.
//!
//! A lens has exactly one focus and can both read and replace it
//! ([`Capabilities::LENS`]). Lenses may change the type of their focus: a
//! lens from `S` to `A` can rebuild a `T` from a `B`.
//!
//! # Laws
//!
//! Every lawful lens satisfies:
//!
//! 1. **GetPut**: `set(s, get(s)) == s`
//! 2. **PutGet**: `get(set(s, v)) == v`
//! 3. **PutPut**: `set(set(s, v1), v2) == set(s, v2)`
//!
//! # Examples
//!
//! ```
//! use opticore::lens;
//! use opticore::optics::Context;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! let context = Context::background();
//! let x_lens = lens!(Point, x);
//!
//! let point = Point { x: 10, y: 20 };
//! assert_eq!(x_lens.get(&context, &point).unwrap(), 10);
//!
//! let updated = x_lens.set(&context, point, 100).unwrap();
//! assert_eq!(updated, Point { x: 100, y: 20 });
//! assert_eq!(x_lens.to_string(), "Field(Point.x)");
//! ```

use std::sync::Arc;

use super::capability::Capabilities;
use super::expression::Expression;
use super::optic::{IterateFn, Optic};
use super::sequence::Indexed;

/// Creates a lens from a getter and a setter.
///
/// The focus has the unit index.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, lens};
///
/// let name_length = lens(
///     "NameLength",
///     |name: &String| name.len(),
///     |name: String, length: usize| name.chars().cycle().take(length).collect::<String>(),
/// );
/// let context = Context::background();
/// assert_eq!(name_length.get(&context, &"abc".to_string()).unwrap(), 3);
/// assert_eq!(name_length.set(&context, "ab".to_string(), 5).unwrap(), "ababa");
/// ```
pub fn lens<S, T, A, B, G, P>(
    expression: impl Into<Expression>,
    get: G,
    set: P,
) -> Optic<(), S, T, A, B>
where
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
    G: Fn(&S) -> A + Send + Sync + 'static,
    P: Fn(S, B) -> T + Send + Sync + 'static,
{
    let get = Arc::new(get);
    let reader = Arc::clone(&get);
    let iterate: IterateFn<(), S, A> =
        Arc::new(move |_, source, sink| sink(Ok(Indexed::new((), reader(source)))));

    Optic::from_iterate(expression.into(), Capabilities::LENS, iterate)
        .with_modify_fn(Arc::new(move |_, source, function| {
            let value = function(&(), get(&source))?;
            Ok(set(source, value))
        }))
        .with_length(|_| 1)
}

/// Creates a lens for a struct field.
///
/// The generated lens clones the field on read and uses field assignment on
/// write. Its expression is `Field(Type.field)`.
///
/// # Syntax
///
/// ```text
/// lens!(StructType, field_name)
/// ```
///
/// # Example
///
/// ```
/// use opticore::lens;
/// use opticore::optics::Context;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Address { city: String }
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Person { name: String, address: Address }
///
/// let context = Context::background();
/// let city = lens!(Person, address).compose(lens!(Address, city));
///
/// let person = Person {
///     name: "Alice".to_string(),
///     address: Address { city: "Tokyo".to_string() },
/// };
/// assert_eq!(city.get(&context, &person).unwrap(), "Tokyo");
/// assert_eq!(city.to_string(), "Field(Person.address) | Field(Address.city)");
///
/// let moved = city.set(&context, person, "Osaka".to_string()).unwrap();
/// assert_eq!(moved.address.city, "Osaka");
/// ```
#[macro_export]
macro_rules! lens {
    ($struct_type:ident, $field:ident) => {
        $crate::optics::lens(
            $crate::optics::Expression::new("Field")
                .param(concat!(stringify!($struct_type), ".", stringify!($field))),
            |source: &$struct_type| source.$field.clone(),
            |mut source: $struct_type, value| {
                source.$field = value;
                source
            },
        )
    };
    ($struct_type:ident < $($generic:tt),+ >, $field:ident) => {
        $crate::optics::lens(
            $crate::optics::Expression::new("Field")
                .param(concat!(stringify!($struct_type), ".", stringify!($field))),
            |source: &$struct_type<$($generic),+>| source.$field.clone(),
            |mut source: $struct_type<$($generic),+>, value| {
                source.$field = value;
                source
            },
        )
    };
    ($struct_type:path, $field:ident) => {
        $crate::optics::lens(
            $crate::optics::Expression::new("Field")
                .param(concat!(stringify!($struct_type), ".", stringify!($field))),
            |source: &$struct_type| source.$field.clone(),
            |mut source: $struct_type, value| {
                source.$field = value;
                source
            },
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::Context;

    #[derive(Clone, PartialEq, Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Clone, PartialEq, Debug)]
    struct Wrapper<T> {
        inner: T,
    }

    #[test]
    fn test_lens_get() {
        let x_lens = lens("X", |point: &Point| point.x, |point: Point, x: i32| Point { x, ..point });
        let point = Point { x: 10, y: 20 };
        assert_eq!(x_lens.get(&Context::background(), &point).unwrap(), 10);
    }

    #[test]
    fn test_lens_set_keeps_other_fields() {
        let x_lens = lens!(Point, x);
        let point = Point { x: 10, y: 20 };
        let updated = x_lens.set(&Context::background(), point, 100).unwrap();
        assert_eq!(updated, Point { x: 100, y: 20 });
    }

    #[test]
    fn test_lens_modify() {
        let x_lens = lens!(Point, x);
        let point = Point { x: 10, y: 20 };
        let doubled = x_lens.modify(&Context::background(), point, |x| x * 2).unwrap();
        assert_eq!(doubled.x, 20);
    }

    #[test]
    fn test_lens_changes_focus_type() {
        let first = lens(
            "First",
            |pair: &(i32, char)| pair.0,
            |pair: (i32, char), text: String| (text, pair.1),
        );
        let rebuilt = first
            .modify(&Context::background(), (7, 'x'), |value| value.to_string())
            .unwrap();
        assert_eq!(rebuilt, ("7".to_string(), 'x'));
    }

    #[test]
    fn test_lens_macro_with_generics() {
        let inner = lens!(Wrapper<i32>, inner);
        let wrapped = Wrapper { inner: 5 };
        assert_eq!(inner.get(&Context::background(), &wrapped).unwrap(), 5);
        assert_eq!(inner.to_string(), "Field(Wrapper.inner)");
    }

    #[test]
    fn test_lens_capabilities_and_length() {
        let y_lens = lens!(Point, y);
        assert_eq!(y_lens.capabilities(), Capabilities::LENS);
        let point = Point { x: 0, y: 0 };
        assert_eq!(y_lens.length(&Context::background(), &point).unwrap(), 1);
    }
}
