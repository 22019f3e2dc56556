//! Built-in demo schema, used when no `--schema` file is given.

const DEMO_SCHEMA: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/demo-schema.toml"));

#[must_use]
pub fn demo_schema() -> &'static str {
    DEMO_SCHEMA
}
