//! Symbol identifiers derived from raw object names.

/// Default suffix of raw bar objects (`BHP.AX_raw.csv` -> `BHP.AX`).
pub const RAW_SUFFIX: &str = "_raw.csv";

/// Derive the symbol from an object path: take the file name, strip `suffix`, upper-case.
///
/// Returns `None` when the file name does not end with `suffix` or nothing is left
/// after stripping it.
pub fn symbol_from_path(path: &str, suffix: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next()?;
    let stem = name.strip_suffix(suffix)?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_suffix_and_uppercases() {
        assert_eq!(
            symbol_from_path("raw/asxStocks/bhp.ax_raw.csv", RAW_SUFFIX).as_deref(),
            Some("BHP.AX")
        );
        assert_eq!(symbol_from_path("CBA_raw.csv", RAW_SUFFIX).as_deref(), Some("CBA"));
    }

    #[test]
    fn rejects_foreign_names() {
        assert_eq!(symbol_from_path("raw/asxStocks/notes.csv", RAW_SUFFIX), None);
        assert_eq!(symbol_from_path("raw/asxStocks/_raw.csv", RAW_SUFFIX), None);
    }
}
