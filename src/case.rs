/// Convert a snake_case name to camelCase
///
/// Every word after the first is capitalized and the words are joined, so
/// `total_row_count` becomes `totalRowCount`. This is the wire-name mapping
/// for all resource models: outgoing payloads build their keys with it and
/// incoming models decode with serde's equivalent `camelCase` rule.
pub fn to_camel(name: &str) -> String {
    name.split('_')
        .enumerate()
        .map(|(i, word)| if i == 0 { word.to_string() } else { capitalize(word) })
        .collect()
}

// Upper-cases the first character and lower-cases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
