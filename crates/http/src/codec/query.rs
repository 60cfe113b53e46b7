use std::collections::HashMap;

/// Splits a raw request target into its path and query parameters.
///
/// Keys and values are taken verbatim (no percent decoding), pairs without `=`
/// are dropped and a repeated key keeps its last value.
pub fn split_target(target: &str) -> (String, HashMap<String, String>) {
    let Some((path, raw_query)) = target.split_once('?') else {
        return (target.to_owned(), HashMap::new());
    };

    let query = raw_query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect();

    (path.to_owned(), query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_query() {
        let (path, query) = split_target("/api/v1/users");
        assert_eq!(path, "/api/v1/users");
        assert!(query.is_empty());
    }

    #[test]
    fn last_value_wins() {
        let (path, query) = split_target("/index/?a=1&b=2&a=3");
        assert_eq!(path, "/index/");
        assert_eq!(query.len(), 2);
        assert_eq!(query["a"], "3");
        assert_eq!(query["b"], "2");
    }

    #[test]
    fn pairs_without_equals_are_dropped() {
        let (_, query) = split_target("/p?flag&role=admin&&x=");
        assert_eq!(query.len(), 2);
        assert_eq!(query["role"], "admin");
        assert_eq!(query["x"], "");
    }

    #[test]
    fn value_keeps_later_equals_and_encoding() {
        let (path, query) = split_target("/p?token=a=b&name=J%20D?");
        assert_eq!(path, "/p");
        assert_eq!(query["token"], "a=b");
        assert_eq!(query["name"], "J%20D?");
    }
}
