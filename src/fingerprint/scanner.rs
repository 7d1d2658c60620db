//! Сканер JSON-объекта без полной десериализации.
//!
//! Находит сырой диапазон байт значения по ключу верхнего уровня. Никаких
//! промежуточных структур не создаётся: возвращается срез исходного буфера.
//! Тела строк пропускаются через `memchr`.
//!
//! Для строковых значений возвращается содержимое без кавычек (escape-
//! последовательности не раскрываются). Для массивов, объектов, чисел и
//! литералов возвращаются их точные байты, включая пробелы внутри.

use memchr::memchr2;

use eventbridge_error::ExtractionError;

/// Ищет значение ключа `key` на верхнем уровне JSON-объекта `input`.
///
/// Ключи во вложенных объектах не учитываются: для
/// `{"meta":{"providerId":"a"},"providerId":"b"}` вернётся `b`.
pub fn find_top_level_field<'a>(
    input: &'a [u8],
    key: &'static str,
) -> Result<&'a [u8], ExtractionError> {
    let mut pos = skip_whitespace(input, 0);
    expect_byte(input, pos, b'{', "expected `{` at start of payload")?;
    pos += 1;

    loop {
        pos = skip_whitespace(input, pos);
        match input.get(pos) {
            Some(b'}') => return Err(ExtractionError::MissingField { field: key }),
            Some(b'"') => {}
            Some(_) => return Err(malformed(pos, "expected object key")),
            None => return Err(malformed(pos, "unexpected end of payload")),
        }

        let key_end = string_end(input, pos + 1)?;
        let matches = &input[pos + 1..key_end] == key.as_bytes();

        pos = skip_whitespace(input, key_end + 1);
        expect_byte(input, pos, b':', "expected `:` after object key")?;
        pos = skip_whitespace(input, pos + 1);

        if matches {
            return value_span(input, pos);
        }

        pos = skip_value(input, pos)?;
        pos = skip_whitespace(input, pos);
        match input.get(pos) {
            Some(b',') => pos += 1,
            Some(b'}') => return Err(ExtractionError::MissingField { field: key }),
            Some(_) => return Err(malformed(pos, "expected `,` or `}` after value")),
            None => return Err(malformed(pos, "unexpected end of payload")),
        }
    }
}

fn value_span(
    input: &[u8],
    start: usize,
) -> Result<&[u8], ExtractionError> {
    if input.get(start) == Some(&b'"') {
        let end = string_end(input, start + 1)?;
        return Ok(&input[start + 1..end]);
    }
    let end = skip_value(input, start)?;
    Ok(&input[start..end])
}

/// Возвращает позицию сразу за значением, начинающимся с `start`.
fn skip_value(
    input: &[u8],
    start: usize,
) -> Result<usize, ExtractionError> {
    match input.get(start) {
        Some(b'"') => Ok(string_end(input, start + 1)? + 1),
        Some(b'{') | Some(b'[') => skip_container(input, start),
        Some(_) => {
            let len = input[start..]
                .iter()
                .position(|b| matches!(b, b',' | b'}' | b']') || b.is_ascii_whitespace())
                .unwrap_or(input.len() - start);
            if len == 0 {
                return Err(malformed(start, "expected value"));
            }
            Ok(start + len)
        }
        None => Err(malformed(start, "expected value")),
    }
}

fn skip_container(
    input: &[u8],
    start: usize,
) -> Result<usize, ExtractionError> {
    let mut depth = 0usize;
    let mut pos = start;

    while let Some(&b) = input.get(pos) {
        match b {
            b'"' => {
                pos = string_end(input, pos + 1)?;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos + 1);
                }
            }
            _ => {}
        }
        pos += 1;
    }

    Err(malformed(start, "unterminated object or array"))
}

/// Возвращает позицию закрывающей кавычки строки, тело которой начинается
/// с `from`.
fn string_end(
    input: &[u8],
    from: usize,
) -> Result<usize, ExtractionError> {
    let mut pos = from;
    loop {
        let rest = input
            .get(pos..)
            .ok_or_else(|| malformed(from, "unterminated string"))?;
        match memchr2(b'"', b'\\', rest) {
            Some(offset) if rest[offset] == b'\\' => pos += offset + 2,
            Some(offset) => return Ok(pos + offset),
            None => return Err(malformed(from, "unterminated string")),
        }
    }
}

fn skip_whitespace(
    input: &[u8],
    mut pos: usize,
) -> usize {
    while input.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}

fn expect_byte(
    input: &[u8],
    pos: usize,
    expected: u8,
    reason: &'static str,
) -> Result<(), ExtractionError> {
    match input.get(pos) {
        Some(&b) if b == expected => Ok(()),
        _ => Err(malformed(pos, reason)),
    }
}

fn malformed(
    offset: usize,
    reason: &'static str,
) -> ExtractionError {
    ExtractionError::Malformed { offset, reason }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::string(br#"{"providerId":"p1"}"#, "providerId", b"p1" as &[u8])]
    #[case::array(br#"{"topics":["a","b"]}"#, "topics", br#"["a","b"]"#)]
    #[case::array_keeps_inner_whitespace(br#"{ "topics" : [ "a" , "b" ] }"#, "topics", br#"[ "a" , "b" ]"#)]
    #[case::second_key(br#"{"topics":["x"],"providerId":"kafka"}"#, "providerId", b"kafka")]
    #[case::number(br#"{"n": 42 }"#, "n", b"42")]
    #[case::literal(br#"{"a":true,"b":null}"#, "b", b"null")]
    #[case::escaped_quote(br#"{"providerId":"p\"1"}"#, "providerId", br#"p\"1"#)]
    #[case::object_value(br#"{"data":{"k":[1,{"x":"}"}]}}"#, "data", br#"{"k":[1,{"x":"}"}]}"#)]
    fn test_finds_raw_span(
        #[case] input: &[u8],
        #[case] key: &'static str,
        #[case] expected: &[u8],
    ) {
        assert_eq!(find_top_level_field(input, key).unwrap(), expected);
    }

    /// Тест проверяет, что одноимённый ключ во вложенном объекте не
    /// считается полем верхнего уровня.
    #[test]
    fn test_nested_key_is_ignored() {
        let input = br#"{"meta":{"providerId":"inner"},"providerId":"outer"}"#;
        assert_eq!(
            find_top_level_field(input, "providerId").unwrap(),
            b"outer"
        );

        let input = br#"{"meta":{"providerId":"inner"}}"#;
        assert_eq!(
            find_top_level_field(input, "providerId"),
            Err(ExtractionError::MissingField {
                field: "providerId"
            })
        );
    }

    /// Тест проверяет, что строка с экранированной кавычкой в соседнем
    /// значении не сбивает сканер.
    #[test]
    fn test_skips_strings_with_escapes() {
        let input = br#"{"note":"say \"topics\": [] \\","topics":["t"]}"#;
        assert_eq!(find_top_level_field(input, "topics").unwrap(), br#"["t"]"#);
    }

    #[rstest]
    #[case::empty_object(b"{}" as &[u8])]
    #[case::other_keys(br#"{"topic":"a","provider":"b"}"#)]
    fn test_missing_field(#[case] input: &[u8]) {
        assert_eq!(
            find_top_level_field(input, "topics"),
            Err(ExtractionError::MissingField { field: "topics" })
        );
    }

    #[rstest]
    #[case::not_an_object(br#"["topics"]"# as &[u8])]
    #[case::empty(b"")]
    #[case::unterminated_string(br#"{"topics":["a}"#)]
    #[case::unterminated_array(br#"{"other":[1,2,"topics":["a"]"#)]
    #[case::missing_colon(br#"{"topics" ["a"]}"#)]
    #[case::trailing_escape(br#"{"topics":"\"#)]
    fn test_malformed_payload(#[case] input: &[u8]) {
        assert!(matches!(
            find_top_level_field(input, "topics"),
            Err(ExtractionError::Malformed { .. })
        ));
    }
}
