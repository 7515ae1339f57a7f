/// Converts a snake_case API name to PascalCase, e.g. `NvimBufGetLines`.
pub fn to_pascal_case(snake_case: &str) -> String {
    let mut result = String::with_capacity(snake_case.len());
    for word in split_snake_case(snake_case) {
        push_with_first(&mut result, word, char::to_uppercase);
    }
    result
}

/// Converts a snake_case API name to camelCase, e.g. `nvimBufGetLines`.
pub fn to_camel_case(snake_case: &str) -> String {
    let mut words = split_snake_case(snake_case);
    let mut result = String::with_capacity(snake_case.len());
    if let Some(first) = words.next() {
        push_with_first(&mut result, first, char::to_lowercase);
    }
    for word in words {
        push_with_first(&mut result, word, char::to_uppercase);
    }
    result
}

/// Runs of underscores never produce empty words.
fn split_snake_case(name: &str) -> impl Iterator<Item = &str> {
    name.split('_').filter(|word| !word.is_empty())
}

/// Only the first character changes case, so a name that is already in the
/// target case converts to itself.
fn push_with_first<I>(result: &mut String, word: &str, convert: impl Fn(char) -> I)
where
    I: Iterator<Item = char>,
{
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        result.extend(convert(first));
        result.push_str(chars.as_str());
    }
}
