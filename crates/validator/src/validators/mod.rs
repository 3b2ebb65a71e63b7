//! Built-in leaf validators.
//!
//! Each validator checks one already-coerced value against one schema
//! keyword and returns an unpositioned [`ValidationError`](crate::foundation::ValidationError).
//!
//! - **String**: [`MinLength`], [`MaxLength`], [`Matches`]
//! - **Numeric**: [`Minimum`], [`Maximum`], [`ExclusiveMinimum`],
//!   [`ExclusiveMaximum`], [`MultipleOf`]
//! - **Collection**: [`MinItems`], [`MaxItems`], [`UniqueItems`],
//!   [`MinProperties`], [`MaxProperties`]
//! - **Value**: [`AllowedValues`], [`ConstValue`]
//! - **Network**: [`Hostname`], [`Email`]

mod divisibility;
mod enumeration;
mod length;
mod network;
mod pattern;
mod range;
mod size;

pub use divisibility::{MultipleOf, multiple_of};
pub use enumeration::{AllowedValues, ConstValue, json_eq, quote};
pub use length::{MaxLength, MinLength, max_length, min_length};
pub use network::{Email, Hostname, email, hostname};
pub use pattern::{Matches, matches};
pub use range::{
    ExclusiveMaximum, ExclusiveMinimum, Maximum, Minimum, exclusive_maximum, exclusive_minimum,
    maximum, minimum,
};
pub use size::{
    MaxItems, MaxProperties, MinItems, MinProperties, UniqueItems, max_items, max_properties,
    min_items, min_properties, unique_items,
};

/// `"1 item"`, `"3 items"`, `"1 property"`, `"2 properties"`.
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else if let Some(stem) = noun.strip_suffix('y') {
        format!("{count} {stem}ies")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::plural;

    #[test]
    fn pluralizes() {
        assert_eq!(plural(1, "character"), "1 character");
        assert_eq!(plural(0, "item"), "0 items");
        assert_eq!(plural(2, "property"), "2 properties");
    }
}
