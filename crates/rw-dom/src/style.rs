//! Inline `style` attribute declarations.

/// Parse `prop: value; ...` into ordered pairs. Property names are lower-cased.
pub(crate) fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            (!prop.is_empty()).then(|| (prop.to_ascii_lowercase(), value.trim().to_owned()))
        })
        .collect()
}

pub(crate) fn serialize_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(prop, value)| format!("{prop}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}
