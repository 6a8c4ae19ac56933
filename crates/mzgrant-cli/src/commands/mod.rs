//! CLI command implementations.

pub mod default_privileges;
pub mod id;
pub mod object;
pub mod plan;

use serde::Serialize;

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Comma-separated privilege keywords.
pub(crate) fn keywords<'a, I>(privileges: I) -> String
where
    I: IntoIterator<Item = &'a mzgrant_privilege::Privilege>,
{
    privileges
        .into_iter()
        .map(|p| p.keyword())
        .collect::<Vec<_>>()
        .join(", ")
}
