//! Field selection for the `includeFields` query parameter.
//!
//! # Overview
//! The listings API only returns the fields a request asks for. The request
//! names them with a small bracket language:
//!
//! ```text
//! search(result(listings(listing(id, sourceId, pricingInfos))), totalCount)
//! ```
//!
//! Each level of that tree is a selector node: a struct whose fields are
//! either `bool` flags (scalar or array fields of the provider object) or
//! nested selector nodes (sub-objects). Nodes are declared with the
//! `field_selector!` macro, which fixes the field list and its order at
//! compile time and generates the `FieldSelector` impl.
//!
//! # Grammar
//! - A set flag emits its name converted to camelCase.
//! - A nested node emits `name(<children>)`, or nothing at all when none of
//!   its descendants are set. Nested names are emitted as declared.
//! - Siblings are joined by `", "`. Only nested calls wrap their body in
//!   parentheses.

mod fields;

pub use fields::*;

use crate::error::ApiError;

/// One declared field of a selector node, in declaration order.
pub enum Entry<'a> {
    Flag(&'static str, bool),
    Nested(&'static str, &'a dyn FieldSelector),
}

/// A node of the field-selection tree.
///
/// Implemented by `field_selector!`; the required methods are not meant to
/// be written by hand.
pub trait FieldSelector {
    /// Type name of the node, used in error messages.
    fn name(&self) -> &'static str;

    /// Declared fields with their current state.
    fn entries(&self) -> Vec<Entry<'_>>;

    /// A node with every flag set, recursively.
    fn all() -> Self
    where
        Self: Sized;

    /// A node with exactly the named flags set. Names are not checked.
    #[doc(hidden)]
    fn with_flags(names: &[&str]) -> Self
    where
        Self: Sized;

    /// Same as `Self::all()`, spelled as an operation on an existing value.
    fn select_all(&self) -> Self
    where
        Self: Sized,
    {
        Self::all()
    }

    /// Build a node where exactly `names` are set.
    ///
    /// Only flag fields can be named; nested nodes stay empty. Any other name
    /// is rejected with `ApiError::InvalidField`.
    fn only(names: &[&str]) -> Result<Self, ApiError>
    where
        Self: Sized + Default,
    {
        let template = Self::default();
        let flags = template.flag_names();
        if let Some(unknown) = names.iter().find(|name| !flags.iter().any(|f| f == *name)) {
            return Err(ApiError::InvalidField {
                selector: template.name(),
                field: unknown.to_string(),
            });
        }
        Ok(Self::with_flags(names))
    }

    /// Names of the flag fields, in declaration order.
    fn flag_names(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Flag(name, _) => Some(name),
                Entry::Nested(..) => None,
            })
            .collect()
    }

    /// True when at least one flag in this subtree is set.
    fn is_active(&self) -> bool {
        self.entries().into_iter().any(|entry| match entry {
            Entry::Flag(_, set) => set,
            Entry::Nested(_, child) => child.is_active(),
        })
    }

    /// Serialize this node. `nested` wraps the body in parentheses.
    fn render(&self, nested: bool) -> String {
        let mut tokens = Vec::new();
        for entry in self.entries() {
            match entry {
                Entry::Flag(name, true) => tokens.push(camel_case(name)),
                Entry::Flag(_, false) => {}
                Entry::Nested(name, child) => {
                    let body = child.render(true);
                    if body != "()" {
                        tokens.push(format!("{name}{body}"));
                    }
                }
            }
        }
        let body = tokens.join(", ");
        if nested {
            format!("({body})")
        } else {
            body
        }
    }

    /// The value of the `includeFields` query parameter for this selection.
    fn include_fields(&self) -> String {
        self.render(false)
    }
}

/// Convert a `snake_case` field name to the provider's `camelCase`.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split('_').filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if out.is_empty() {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}

/// Declare a selector node.
///
/// Fields typed `bool` become flags; any other type must itself be a node
/// declared with this macro. Declaration order is serialization order.
macro_rules! field_selector {
    (@entry $self:ident, $field:ident, bool) => {
        $crate::selector::Entry::Flag(stringify!($field), $self.$field)
    };
    (@entry $self:ident, $field:ident, $kind:ident) => {
        $crate::selector::Entry::Nested(stringify!($field), &$self.$field)
    };
    (@all bool) => {
        true
    };
    (@all $kind:ident) => {
        <$kind as $crate::selector::FieldSelector>::all()
    };
    (@flag $names:ident, $field:ident, bool) => {
        $names.contains(&stringify!($field))
    };
    (@flag $names:ident, $field:ident, $kind:ident) => {
        <$kind as ::std::default::Default>::default()
    };
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $kind:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $kind,
            )*
        }

        impl $crate::selector::FieldSelector for $name {
            fn name(&self) -> &'static str {
                stringify!($name)
            }

            fn entries(&self) -> Vec<$crate::selector::Entry<'_>> {
                vec![$($crate::selector::field_selector!(@entry self, $field, $kind)),*]
            }

            fn all() -> Self {
                Self {
                    $($field: $crate::selector::field_selector!(@all $kind)),*
                }
            }

            fn with_flags(names: &[&str]) -> Self {
                Self {
                    $($field: $crate::selector::field_selector!(@flag names, $field, $kind)),*
                }
            }
        }
    };
}

pub(crate) use field_selector;
