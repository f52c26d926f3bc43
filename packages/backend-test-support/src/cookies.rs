//! Raw `Set-Cookie` inspection.
//!
//! Assertions on the cookie contract are made against the header text the
//! browser receives, not against a parsed cookie jar.

use actix_web::http::header::{HeaderMap, SET_COOKIE};

/// One `Set-Cookie` header, split into name, value and attributes.
#[derive(Debug, Clone)]
pub struct SetCookie {
    pub raw: String,
    pub name: String,
    pub value: String,
    attributes: Vec<String>,
}

impl SetCookie {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';').map(str::trim);
        let (name, value) = parts.next()?.split_once('=')?;
        Some(Self {
            raw: raw.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            attributes: parts.map(str::to_string).collect(),
        })
    }

    /// True if the attribute (e.g. `HttpOnly` or `Max-Age=1800`) is present,
    /// compared case-insensitively.
    pub fn has_attr(&self, attr: &str) -> bool {
        self.attributes.iter().any(|a| a.eq_ignore_ascii_case(attr))
    }

    /// True if any attribute starts with `name=` or equals `name`.
    pub fn has_attr_named(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| {
            let key = a.split('=').next().unwrap_or_default();
            key.eq_ignore_ascii_case(name)
        })
    }
}

/// The first `Set-Cookie` header for `name`, if any.
pub fn find_set_cookie(headers: &HeaderMap, name: &str) -> Option<SetCookie> {
    headers
        .get_all(SET_COOKIE)
        .filter_map(|v| v.to_str().ok())
        .filter_map(SetCookie::parse)
        .find(|c| c.name == name)
}
