use syn::{Attribute, LitStr, Result};

/// Stored name of a field or variant: its `#[converter(rename = "..")]`
/// value, or the identifier itself.
pub(crate) fn stored_name(attrs: &[Attribute], ident: &str) -> Result<String> {
    let mut name = ident.to_string();
    for attr in attrs {
        if attr.path().is_ident("converter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let s: LitStr = meta.value()?.parse()?;
                    if s.value().is_empty() {
                        return Err(meta.error("rename cannot be empty"));
                    }
                    name = s.value();
                    Ok(())
                } else {
                    Err(meta.error("Unknown converter attribute, expected `rename`"))
                }
            })?;
        }
    }
    Ok(name)
}

/// Field names listed in a struct-level `#[converter(ignored = "a, b")]`.
pub(crate) fn ignored_fields(attrs: &[Attribute]) -> Result<Vec<String>> {
    let mut ignored = vec![];
    for attr in attrs {
        if attr.path().is_ident("converter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignored") {
                    let s: LitStr = meta.value()?.parse()?;
                    ignored.extend(
                        s.value()
                            .split(',')
                            .map(|f| f.trim().to_string())
                            .filter(|f| !f.is_empty()),
                    );
                    Ok(())
                } else {
                    Err(meta.error("Unknown converter attribute, expected `ignored`"))
                }
            })?;
        }
    }
    Ok(ignored)
}
