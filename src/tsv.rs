use std::collections::BTreeMap;

/// Splits a TSV body into rows of fields. Every line becomes a row, so a
/// trailing newline yields a final empty row.
pub fn parse_tsv(data: &str) -> Vec<Vec<String>> {
    data.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(|line| {
            if line.is_empty() {
                Vec::new()
            } else {
                line.split('\t').map(str::to_string).collect()
            }
        })
        .collect()
}

/// Builds a key/value map from two columns of a TSV body. Rows with fewer than
/// two fields, an empty key, or too few fields for either column are skipped;
/// a repeated key keeps the last value.
pub fn parse_tsv_to_dict(data: &str, col_keys: usize, col_values: usize) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();
    for row in parse_tsv(data) {
        if row.len() < 2 {
            continue;
        }
        let (Some(key), Some(value)) = (row.get(col_keys), row.get(col_values)) else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        result.insert(key.clone(), value.clone());
    }
    result
}
