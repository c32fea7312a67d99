//! `OSC 8` hyperlink parsing: `OSC 8 ; params ; uri ST`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperlinkCommand {
    pub id: Option<String>,
    /// `None` (empty uri field) closes the currently active hyperlink.
    pub uri: Option<String>,
}

/// `params` is `key=value:key=value`; the only recognized key is `id`,
/// unrecognized keys are ignored per §4.2's robustness rules.
pub fn parse(body: &[u8]) -> Option<HyperlinkCommand> {
    let text = std::str::from_utf8(body).ok()?;
    let mut parts = text.splitn(2, ';');
    let params = parts.next()?;
    let uri = parts.next().unwrap_or("");

    let mut id = None;
    for kv in params.split(':') {
        if let Some((k, v)) = kv.split_once('=') {
            if k == "id" {
                id = Some(v.to_string());
            }
        }
    }

    Some(HyperlinkCommand {
        id,
        uri: if uri.is_empty() { None } else { Some(uri.to_string()) },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_with_id() {
        let cmd = parse(b"id=foo;https://example.com").unwrap();
        assert_eq!(cmd.id.as_deref(), Some("foo"));
        assert_eq!(cmd.uri.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn empty_uri_closes() {
        let cmd = parse(b";").unwrap();
        assert_eq!(cmd.uri, None);
    }

    #[test]
    fn no_params_just_uri() {
        let cmd = parse(b";https://example.com").unwrap();
        assert_eq!(cmd.id, None);
        assert_eq!(cmd.uri.as_deref(), Some("https://example.com"));
    }
}
