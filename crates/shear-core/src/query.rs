//! Query-tag codec.
//!
//! A forked module id is a canonical id plus one query parameter holding
//! the set of export names requested from it:
//!
//! ```text
//! src/utils.ts?tss-split-exports=bar,foo
//! ```
//!
//! The encoding is canonical: names are sorted ascending by code point
//! after decoding, percent-encoded individually, and joined with a literal
//! comma. Equal sets therefore always serialize to the same id, which is
//! what lets an id-keyed module cache treat equal forks as one node.
//!
//! Decoding splits on the raw `,` separator before percent-decoding each
//! name, so identifier characters that are themselves encoded commas are
//! never mis-split.

use std::collections::BTreeSet;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Query parameter carrying the requested export names.
pub const SPLIT_EXPORTS_PARAM: &str = "tss-split-exports";

/// Bytes that must be escaped inside an encoded name. Covers the tag's own
/// separators (`,`, `&`, `=`, `?`), the escape character itself, `#`, `+`,
/// both quote characters (encoded names end up inside string literals),
/// and whitespace. Non-ASCII bytes are always percent-encoded.
const NAME_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b',')
    .add(b'=')
    .add(b'?');

/// Splits an id into its path part and raw query (without the `?`).
fn split_query(id: &str) -> (&str, Option<&str>) {
    match id.find('?') {
        Some(i) => (&id[..i], Some(&id[i + 1..])),
        None => (id, None),
    }
}

/// Returns the raw (encoded) tag value within a query string, if present.
fn tag_value(query: &str) -> Option<&str> {
    query.split('&').find_map(|param| {
        let (key, value) = param.split_once('=').unwrap_or((param, ""));
        (key == SPLIT_EXPORTS_PARAM).then_some(value)
    })
}

/// Whether `id` carries a requested-export tag.
pub fn has_tag(id: &str) -> bool {
    split_query(id)
        .1
        .is_some_and(|query| tag_value(query).is_some())
}

/// Decodes the requested-export set from `id`, or `None` when untagged.
pub fn decode_tag(id: &str) -> Option<BTreeSet<String>> {
    let (_, query) = split_query(id);
    let raw = tag_value(query?)?;
    let names = raw
        .split(',')
        .filter(|part| !part.is_empty())
        .map(|part| percent_decode_str(part).decode_utf8_lossy().into_owned())
        .collect();
    Some(names)
}

/// Removes the requested-export tag from `id`, preserving any other query
/// parameters in their original order.
pub fn strip_tag(id: &str) -> String {
    let (path, Some(query)) = split_query(id) else {
        return id.to_string();
    };
    if tag_value(query).is_none() {
        return id.to_string();
    }
    let rest: Vec<&str> = query
        .split('&')
        .filter(|param| {
            let key = param.split_once('=').map_or(*param, |(key, _)| key);
            key != SPLIT_EXPORTS_PARAM
        })
        .collect();
    if rest.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", rest.join("&"))
    }
}

/// Appends the canonical encoding of `names` to `id`.
///
/// `BTreeSet` iteration already yields names in ascending code-point
/// order, so the serialized form is the same for any insertion order.
pub fn append_tag(id: &str, names: &BTreeSet<String>) -> String {
    let encoded: Vec<String> = names
        .iter()
        .map(|name| utf8_percent_encode(name, NAME_ENCODE_SET).to_string())
        .collect();
    let separator = if id.contains('?') { '&' } else { '?' };
    format!(
        "{id}{separator}{SPLIT_EXPORTS_PARAM}={}",
        encoded.join(",")
    )
}

/// Splits `id` into its untagged form and the decoded set, if tagged.
pub fn split_tag(id: &str) -> (String, Option<BTreeSet<String>>) {
    match decode_tag(id) {
        Some(names) => (strip_tag(id), Some(names)),
        None => (id.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_append_sorts_names() {
        let id = append_tag("./utils", &set(&["foo", "bar"]));
        assert_eq!(id, "./utils?tss-split-exports=bar,foo");
    }

    #[test]
    fn test_append_uses_ampersand_when_query_present() {
        let id = append_tag("./utils?v=1", &set(&["foo"]));
        assert_eq!(id, "./utils?v=1&tss-split-exports=foo");
    }

    #[test]
    fn test_has_tag() {
        assert!(has_tag("./utils?tss-split-exports=foo"));
        assert!(has_tag("./utils?v=1&tss-split-exports=foo"));
        assert!(!has_tag("./utils"));
        assert!(!has_tag("./utils?v=1"));
    }

    #[test]
    fn test_decode_round_trip() {
        let names = set(&["default", "foo", "bar"]);
        let id = append_tag("/src/utils.ts", &names);
        assert_eq!(decode_tag(&id), Some(names));
    }

    #[test]
    fn test_decode_non_ascii_and_symbols() {
        let names = set(&["caf\u{e9}", "$dollar", "\u{540d}\u{524d}", "a,b"]);
        let id = append_tag("/m.ts", &names);
        // The comma inside `a,b` is escaped, never treated as a separator.
        assert!(id.contains("a%2Cb"));
        assert_eq!(decode_tag(&id), Some(names));
    }

    #[test]
    fn test_encoded_comma_is_not_a_separator() {
        // A name containing an encoded comma must survive as one name.
        let raw = format!("/m.ts?{SPLIT_EXPORTS_PARAM}=a%2Cb,c");
        let decoded = decode_tag(&raw).unwrap();
        assert_eq!(decoded, set(&["a,b", "c"]));
    }

    #[test]
    fn test_strip_preserves_other_params() {
        let id = "/m.ts?v=1&tss-split-exports=foo&import";
        assert_eq!(strip_tag(id), "/m.ts?v=1&import");
        assert_eq!(strip_tag("/m.ts?tss-split-exports=foo"), "/m.ts");
        assert_eq!(strip_tag("/m.ts?v=1"), "/m.ts?v=1");
    }

    #[test]
    fn test_strip_after_append_is_identity() {
        for id in ["/m.ts", "/m.ts?v=1", "./rel/x.tsx?a=1&b=2"] {
            let tagged = append_tag(id, &set(&["x", "y"]));
            assert_eq!(strip_tag(&tagged), id);
        }
    }

    #[test]
    fn test_split_tag() {
        let (clean, names) = split_tag("/m.ts?tss-split-exports=bar,foo");
        assert_eq!(clean, "/m.ts");
        assert_eq!(names, Some(set(&["bar", "foo"])));

        let (clean, names) = split_tag("/m.ts?v=1");
        assert_eq!(clean, "/m.ts?v=1");
        assert_eq!(names, None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn round_trips_any_comma_free_set(
                names in prop::collection::btree_set("[^,]{1,12}", 1..8),
                id in "[a-z/._-]{1,24}",
            ) {
                let tagged = append_tag(&id, &names);
                prop_assert_eq!(decode_tag(&tagged), Some(names));
                prop_assert_eq!(strip_tag(&tagged), id);
            }

            #[test]
            fn canonical_for_any_insertion_order(
                names in prop::collection::vec("[a-zA-Z_$][a-zA-Z0-9_$]{0,8}", 1..8),
            ) {
                let forward: BTreeSet<String> = names.iter().cloned().collect();
                let reversed: BTreeSet<String> = names.iter().rev().cloned().collect();
                prop_assert_eq!(
                    append_tag("/m.ts", &forward),
                    append_tag("/m.ts", &reversed)
                );
            }
        }
    }
}
