//! Query-string decoding

use crate::types::ParsedParams;
use url::form_urlencoded;

/// Decode one query-string cell into lower-cased parameters
///
/// Uses `application/x-www-form-urlencoded` rules: `&`-separated pairs,
/// `+` as space, percent-decoding with malformed escapes kept literally and
/// invalid UTF-8 replaced. A single leading `?` is ignored. Parameters keep
/// their order of appearance; when two keys collide after lower-casing, the
/// later value wins at the earlier position.
pub fn decode_query(raw: &str) -> ParsedParams {
    let input = raw.strip_prefix('?').unwrap_or(raw);

    let mut params = ParsedParams::new();
    for (key, value) in form_urlencoded::parse(input.as_bytes()) {
        params.insert(key.to_lowercase(), value.into_owned());
    }
    params
}
