use crate::flatten::flattener::ParamMap;

/// Render a parameter map as an `application/x-www-form-urlencoded`
/// query string. Explicit-null entries render as a bare key so the
/// binder on the other side can tell "absent" from "empty".
pub fn to_query_string(params: &ParamMap) -> String {
    let mut parts = Vec::with_capacity(params.len());
    for (name, value) in params {
        match value {
            Some(v) => parts.push(format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(v)
            )),
            None => parts.push(urlencoding::encode(name).into_owned()),
        }
    }
    parts.join("&")
}

/// Append a parameter map to a base URL, picking `?` or `&` depending on
/// whether the base already carries a query.
pub fn redirect_url(base: &str, params: &ParamMap) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, to_query_string(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, Option<&str>)]) -> ParamMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn encodes_names_and_values() {
        let qs = to_query_string(&params(&[
            ("user.name", Some("Alice Smith")),
            ("tags[0]", Some("a&b")),
        ]));
        assert_eq!(qs, "tags%5B0%5D=a%26b&user.name=Alice%20Smith");
    }

    #[test]
    fn null_entries_render_as_bare_keys() {
        let qs = to_query_string(&params(&[("user.nickname", None)]));
        assert_eq!(qs, "user.nickname");
    }

    #[test]
    fn redirect_url_picks_the_separator() {
        let p = params(&[("page", Some("2"))]);
        assert_eq!(redirect_url("/users", &p), "/users?page=2");
        assert_eq!(redirect_url("/users?sort=asc", &p), "/users?sort=asc&page=2");
        assert_eq!(redirect_url("/users", &ParamMap::new()), "/users");
    }
}
