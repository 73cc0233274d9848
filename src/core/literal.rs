use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while_m_n},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, map_opt, opt, value},
    error::{Error, ErrorKind},
    multi::separated_list0,
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};

use super::record::RawValue;

/// Decodes a JSON or Python-literal style string into a `RawValue`.
///
/// The movies CSV stores nested columns as Python reprs
/// (`[{'id': 16, 'name': 'Animation'}]`), so single quotes, tuples,
/// `True`/`False`/`None` and `\xNN`/`\uNNNN`/`\UNNNNNNNN` escapes are
/// accepted alongside strict JSON.
/// Returns `None` when the text is not a complete literal.
#[must_use]
pub fn decode_literal(text: &str) -> Option<RawValue> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        return Some(RawValue::from(value));
    }

    all_consuming(ws(|input| literal(input, 0)))(text)
        .ok()
        .map(|(_, decoded)| decoded)
}

const MAX_DEPTH: usize = 64;

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn literal(input: &str, depth: usize) -> IResult<&str, RawValue> {
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    alt((
        map(string_literal, RawValue::Text),
        map(items('[', ']', depth), RawValue::List),
        map(items('(', ')', depth), RawValue::List),
        map(entries(depth), |entries| {
            RawValue::Object(entries.into_iter().collect())
        }),
        keyword,
        map(double, RawValue::Number),
    ))(input)
}

/// `[a, b]` or `(a, b)`, trailing comma allowed.
fn items<'a>(
    open: char,
    close: char,
    depth: usize,
) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<RawValue>> {
    delimited(
        ws(char(open)),
        terminated(
            separated_list0(char(','), ws(move |input: &'a str| literal(input, depth + 1))),
            opt(char(',')),
        ),
        ws(char(close)),
    )
}

fn entries<'a>(depth: usize) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<(String, RawValue)>> {
    delimited(
        ws(char('{')),
        terminated(
            separated_list0(
                char(','),
                separated_pair(
                    ws(move |input: &'a str| entry_key(input, depth + 1)),
                    char(':'),
                    ws(move |input: &'a str| literal(input, depth + 1)),
                ),
            ),
            opt(char(',')),
        ),
        ws(char('}')),
    )
}

fn entry_key(input: &str, depth: usize) -> IResult<&str, String> {
    let (rest, key) = literal(input, depth)?;
    let key = match key {
        RawValue::Text(text) => text,
        other => other.to_text(),
    };
    Ok((rest, key))
}

fn keyword(input: &str) -> IResult<&str, RawValue> {
    alt((
        value(RawValue::Bool(true), alt((tag("True"), tag("true")))),
        value(RawValue::Bool(false), alt((tag("False"), tag("false")))),
        value(RawValue::Null, alt((tag("None"), tag("null")))),
    ))(input)
}

fn string_literal(input: &str) -> IResult<&str, String> {
    alt((
        delimited(char('\''), string_body("\\'"), char('\'')),
        delimited(char('"'), string_body("\\\""), char('"')),
    ))(input)
}

fn string_body<'a>(stop: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    // escaped_transform rejects an empty body
    map(
        opt(escaped_transform(is_not(stop), '\\', escape)),
        |body: Option<String>| body.unwrap_or_default(),
    )
}

fn escape(input: &str) -> IResult<&str, char> {
    alt((
        value('\\', char('\\')),
        value('\'', char('\'')),
        value('"', char('"')),
        value('\n', char('n')),
        value('\t', char('t')),
        value('\r', char('r')),
        value('\0', char('0')),
        preceded(char('x'), code_point(2)),
        preceded(char('u'), code_point(4)),
        preceded(char('U'), code_point(8)),
    ))(input)
}

fn code_point<'a>(digits: usize) -> impl FnMut(&'a str) -> IResult<&'a str, char> {
    map_opt(
        take_while_m_n(digits, digits, |c: char| c.is_ascii_hexdigit()),
        |hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32),
    )
}

#[cfg(test)]
mod tests {
    use super::decode_literal;
    use crate::core::RawValue;

    #[test]
    fn decodes_python_repr_list_of_dicts() {
        let decoded = decode_literal("[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': \"Comedy\"}]")
            .expect("python literal");
        let RawValue::List(items) = decoded else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].field("name"), Some(&RawValue::Text("Animation".to_owned())));
        assert_eq!(items[1].field("id"), Some(&RawValue::Number(35.0)));
    }

    #[test]
    fn decodes_keywords_and_strict_json() {
        assert_eq!(
            decode_literal("{'adult': False, 'video': None}")
                .and_then(|value| value.field("adult").cloned()),
            Some(RawValue::Bool(false))
        );
        assert_eq!(decode_literal("[1, 2]"), Some(RawValue::List(vec![
            RawValue::Number(1.0),
            RawValue::Number(2.0),
        ])));
    }

    #[test]
    fn decodes_tuples_empty_strings_and_trailing_commas() {
        assert_eq!(
            decode_literal("('', 'a', )"),
            Some(RawValue::List(vec![
                RawValue::Text(String::new()),
                RawValue::Text("a".to_owned()),
            ]))
        );
        assert_eq!(decode_literal("[ ]"), Some(RawValue::List(Vec::new())));
    }

    #[test]
    fn decodes_escapes_to_characters() {
        assert_eq!(
            decode_literal(r"'Caf\xe9 é \U0001F600 \'q\' \\'"),
            Some(RawValue::Text("Café é \u{1F600} 'q' \\".to_owned()))
        );
        assert_eq!(decode_literal(r"'bad \q'"), None);
    }

    #[test]
    fn rejects_incomplete_literals() {
        assert_eq!(decode_literal("[{'id': 16"), None);
        assert_eq!(decode_literal("Pixar Animation"), None);
        assert_eq!(decode_literal("[1] trailing"), None);
    }

    #[test]
    fn rejects_excessive_nesting() {
        let deep = format!("{}{}", "(".repeat(80), ")".repeat(80));
        assert_eq!(decode_literal(&deep), None);
    }
}
